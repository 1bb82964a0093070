//! Campaign request flow — wizard steps, the audience step's attribute
//! selection, and submission of the assembled payload.

pub mod audience;
pub mod engine;
pub mod state_machine;
pub mod submitter;
pub mod types;

pub use audience::AudienceStep;
pub use engine::CampaignFlow;
pub use submitter::{HttpPayloadSubmitter, PayloadSubmitter};
pub use types::{StepStatus, StepView, WizardStep};
