use audience_core::{AudienceError, AudienceResult};
use serde::{Deserialize, Serialize};

use crate::types::WizardStep;

/// Describes a single valid move between wizard steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTransition {
    pub from: WizardStep,
    pub to: WizardStep,
    pub trigger: String,
}

/// Guards wizard navigation by enforcing a finite set of valid step
/// transitions.
#[derive(Debug, Clone)]
pub struct FlowStateMachine {
    pub step: WizardStep,
    pub transitions: Vec<StepTransition>,
}

fn transition(from: WizardStep, to: WizardStep, trigger: &str) -> StepTransition {
    StepTransition {
        from,
        to,
        trigger: trigger.to_string(),
    }
}

impl FlowStateMachine {
    /// Creates a state machine on the objective step with the campaign
    /// request transitions pre-configured.
    pub fn new() -> Self {
        use WizardStep::*;
        let transitions = vec![
            transition(Objective, Audience, "objective_chosen"),
            transition(Audience, ChannelTemplates, "audience_submitted"),
            transition(Audience, Objective, "back"),
            transition(ChannelTemplates, Audience, "back"),
            // Dispatch is a placeholder step; nothing advances into it yet.
            transition(Dispatch, ChannelTemplates, "back"),
        ];

        Self {
            step: Objective,
            transitions,
        }
    }

    /// Returns the trigger of the transition `from -> to`, if allowed.
    pub fn trigger_for(&self, from: WizardStep, to: WizardStep) -> Option<&str> {
        self.transitions
            .iter()
            .find(|t| t.from == from && t.to == to)
            .map(|t| t.trigger.as_str())
    }

    pub fn can_transition(&self, from: WizardStep, to: WizardStep) -> bool {
        self.trigger_for(from, to).is_some()
    }

    /// Moves to `to`, returning the trigger that allowed it.
    pub fn transition(&mut self, to: WizardStep) -> AudienceResult<String> {
        match self.trigger_for(self.step, to) {
            Some(trigger) => {
                let trigger = trigger.to_string();
                self.step = to;
                Ok(trigger)
            }
            None => Err(AudienceError::InvalidStep(format!(
                "{:?} -> {:?}",
                self.step, to
            ))),
        }
    }
}

impl Default for FlowStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
