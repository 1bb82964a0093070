use std::path::Path;

use serde::Deserialize;

use crate::types::ExpressionMode;

/// Root application configuration. Loaded from environment variables
/// with the prefix `AUDIENCE_EXPRESS__` layered over an optional config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub audience: AudienceConfig,
}

/// Where and how the assembled campaign payload is posted.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudienceConfig {
    #[serde(default = "default_audience_name")]
    pub default_name: String,
    #[serde(default)]
    pub expression_mode: ExpressionMode,
}

fn default_endpoint() -> String {
    "http://localhost:8080/api/campaign".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_audience_name() -> String {
    "Campanha_Renegociacao_PR_PF".to_string()
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for AudienceConfig {
    fn default() -> Self {
        Self {
            default_name: default_audience_name(),
            expression_mode: ExpressionMode::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            submission: SubmissionConfig::default(),
            audience: AudienceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables only.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an optional file, then environment variables.
    /// Environment variables win over file values.
    pub fn load_from(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::build(file, None)
    }

    fn build(
        file: Option<&Path>,
        env_override: Option<std::collections::HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "Adding config file source");
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("AUDIENCE_EXPRESS")
                .separator("__")
                .try_parsing(true)
                .source(env_override),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
