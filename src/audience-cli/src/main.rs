//! Audience Express — build, inspect and submit campaign audience segments
//! from the command line.

use std::path::{Path, PathBuf};

use anyhow::Context;
use audience_core::config::AppConfig;
use audience_core::types::{CampaignData, ExpressionMode, ObjectiveKey, ObjectiveSelection};
use audience_flow::{CampaignFlow, HttpPayloadSubmitter};
use audience_segmentation::{summary, AttributeCatalog, AudiencePayloadAssembler, Segment};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "audience-cli")]
#[command(about = "Build and submit campaign audience segments")]
#[command(version)]
struct Cli {
    /// Config file layered under `AUDIENCE_EXPRESS__*` environment variables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List selectable attributes and their value options
    Catalog,
    /// Print the filter expression of a segment file
    Expression {
        #[arg(long)]
        segment: PathBuf,
        #[arg(long, value_enum)]
        mode: Option<Mode>,
    },
    /// Print the confirmation summary of a segment file
    Summary {
        #[arg(long)]
        segment: PathBuf,
    },
    /// Print the campaign request payload for a segment file
    Payload {
        #[arg(long)]
        segment: PathBuf,
        #[arg(long)]
        objective: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Run the campaign request flow and post it to the campaign API
    Submit {
        #[arg(long)]
        segment: PathBuf,
        #[arg(long)]
        objective: String,
        #[arg(long)]
        name: Option<String>,
        /// Campaign API endpoint (overrides config)
        #[arg(long, env = "AUDIENCE_EXPRESS__SUBMISSION__ENDPOINT")]
        endpoint: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Compatible,
    Extended,
}

impl From<Mode> for ExpressionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Compatible => ExpressionMode::Compatible,
            Mode::Extended => ExpressionMode::Extended,
        }
    }
}

fn load_segment(path: &Path) -> anyhow::Result<Segment> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading segment file {}", path.display()))?;
    let segment: Segment = serde_json::from_str(&raw)
        .with_context(|| format!("parsing segment file {}", path.display()))?;
    Ok(segment)
}

fn parse_objective(key: &str) -> anyhow::Result<ObjectiveKey> {
    ObjectiveKey::from_key(key).with_context(|| {
        let known: Vec<&str> = ObjectiveKey::ALL.iter().map(|o| o.key()).collect();
        format!("unknown objective {key}; expected one of {}", known.join(", "))
    })
}

fn print_catalog(catalog: &AttributeCatalog) {
    for checkbox in catalog.checkboxes() {
        println!(
            "[{}] {} -> {}",
            checkbox.category.label(),
            checkbox.label,
            checkbox.attribute
        );
    }
    for attribute in catalog.attributes() {
        println!("\n{} ({:?})", attribute.display_label, attribute.domain);
        for option in attribute.domain.options() {
            println!("  {:<20} {}", option.value, option.label);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audience_cli=info,audience_flow=info".into()),
        )
        .json()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    let catalog = AttributeCatalog::default();

    match cli.command {
        Command::Catalog => print_catalog(&catalog),
        Command::Expression { segment, mode } => {
            let segment = load_segment(&segment)?;
            let mode = mode.map(Into::into).unwrap_or(config.audience.expression_mode);
            println!("{}", audience_segmentation::build_expression(&segment, mode));
        }
        Command::Summary { segment } => {
            let segment = load_segment(&segment)?;
            println!("{}", summary::render(&summary::describe(&segment)));
        }
        Command::Payload {
            segment,
            objective,
            name,
        } => {
            let segment = load_segment(&segment)?;
            let objective = parse_objective(&objective)?;
            let name = name.unwrap_or(config.audience.default_name.clone());
            let assembler = AudiencePayloadAssembler::new(&catalog);
            let data = CampaignData {
                objective: Some(ObjectiveSelection {
                    objective_key: objective,
                }),
                audience: Some(assembler.assemble(
                    name,
                    &segment,
                    config.audience.expression_mode,
                )),
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::Submit {
            segment,
            objective,
            name,
            endpoint,
        } => {
            let segment = load_segment(&segment)?;
            let objective = parse_objective(&objective)?;
            let name = name.unwrap_or(config.audience.default_name.clone());

            let mut submission = config.submission.clone();
            if let Some(endpoint) = endpoint {
                submission.endpoint = endpoint;
            }
            let submitter = HttpPayloadSubmitter::from_config(&submission)?;

            let mut flow = CampaignFlow::with_catalog(catalog);
            flow.choose_objective(objective)?;
            flow.audience_mut().load_segment(segment);
            flow.confirm_audience(&name, config.audience.expression_mode)?;

            info!(endpoint = %submitter.endpoint(), "Submitting campaign request");
            match flow.submit(&submitter).await {
                Ok(response) => {
                    info!(step = ?flow.current_step(), "Campaign request accepted");
                    println!("{}", serde_json::to_string_pretty(&response)?);
                }
                Err(e) => {
                    error!(error = %e, "Campaign request submission failed");
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
