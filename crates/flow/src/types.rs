use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Screens of the campaign request wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Objective,
    Audience,
    ChannelTemplates,
    Dispatch,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Objective,
        WizardStep::Audience,
        WizardStep::ChannelTemplates,
        WizardStep::Dispatch,
    ];

    /// 1-based position shown in the stepper.
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Objective => 1,
            WizardStep::Audience => 2,
            WizardStep::ChannelTemplates => 3,
            WizardStep::Dispatch => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Objective => "Objetivo",
            WizardStep::Audience => "Público",
            WizardStep::ChannelTemplates => "Canal e Templates",
            WizardStep::Dispatch => "Envio",
        }
    }

    pub fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Objective => None,
            WizardStep::Audience => Some(WizardStep::Objective),
            WizardStep::ChannelTemplates => Some(WizardStep::Audience),
            WizardStep::Dispatch => Some(WizardStep::ChannelTemplates),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Pending,
}

/// One entry of the stepper header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepView {
    pub step: WizardStep,
    pub number: u8,
    pub label: String,
    pub status: StepStatus,
}

/// A recorded move between wizard steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepChange {
    pub from: WizardStep,
    pub to: WizardStep,
    pub trigger: String,
    pub at: DateTime<Utc>,
}
