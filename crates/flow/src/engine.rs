use audience_core::types::{AudienceData, CampaignData, ExpressionMode, ObjectiveKey, ObjectiveSelection};
use audience_core::{AudienceError, AudienceResult};
use audience_segmentation::{AttributeCatalog, AudiencePayloadAssembler};
use chrono::Utc;
use tracing::{debug, error, info};

use crate::audience::AudienceStep;
use crate::state_machine::FlowStateMachine;
use crate::submitter::PayloadSubmitter;
use crate::types::{StepChange, StepStatus, StepView, WizardStep};

/// Explicit context of one campaign request: current step, collected data
/// and the audience step's working state.
#[derive(Debug, Clone)]
pub struct CampaignFlow {
    machine: FlowStateMachine,
    data: CampaignData,
    audience: AudienceStep,
    history: Vec<StepChange>,
}

impl CampaignFlow {
    pub fn new() -> Self {
        Self::with_catalog(AttributeCatalog::default())
    }

    pub fn with_catalog(catalog: AttributeCatalog) -> Self {
        Self {
            machine: FlowStateMachine::new(),
            data: CampaignData::default(),
            audience: AudienceStep::new(catalog),
            history: Vec::new(),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.machine.step
    }

    pub fn data(&self) -> &CampaignData {
        &self.data
    }

    pub fn history(&self) -> &[StepChange] {
        &self.history
    }

    pub fn audience(&self) -> &AudienceStep {
        &self.audience
    }

    /// Mutable access to the audience step. Any confirmed audience is
    /// discarded, so edits must be confirmed again before submission.
    pub fn audience_mut(&mut self) -> &mut AudienceStep {
        if self.data.audience.take().is_some() {
            debug!("Confirmed audience discarded for editing");
        }
        &mut self.audience
    }

    /// Stepper header: steps before the current one are completed.
    pub fn steps(&self) -> Vec<StepView> {
        let current = self.current_step();
        WizardStep::ALL
            .iter()
            .map(|&step| StepView {
                step,
                number: step.number(),
                label: step.label().to_string(),
                status: match step.cmp(&current) {
                    std::cmp::Ordering::Less => StepStatus::Completed,
                    std::cmp::Ordering::Equal => StepStatus::Current,
                    std::cmp::Ordering::Greater => StepStatus::Pending,
                },
            })
            .collect()
    }

    pub fn choose_objective(&mut self, objective: ObjectiveKey) -> AudienceResult<()> {
        self.require_step(WizardStep::Objective)?;
        self.data.objective = Some(ObjectiveSelection {
            objective_key: objective,
        });
        info!(%objective, "Objective chosen");
        self.move_to(WizardStep::Audience)
    }

    /// Goes one step back; a no-op on the first step.
    pub fn back(&mut self) -> AudienceResult<()> {
        match self.current_step().previous() {
            Some(previous) => self.move_to(previous),
            None => Ok(()),
        }
    }

    /// Assembles the audience payload from the current segment and stores it
    /// in the campaign data.
    pub fn confirm_audience(
        &mut self,
        audience_name: &str,
        mode: ExpressionMode,
    ) -> AudienceResult<AudienceData> {
        self.require_step(WizardStep::Audience)?;
        if !self.audience.can_continue() {
            return Err(AudienceError::Validation(
                "segment has no condition with both an attribute and a value".to_string(),
            ));
        }

        let assembler = AudiencePayloadAssembler::new(self.audience.catalog());
        let audience = assembler.assemble(audience_name, self.audience.builder().segment(), mode);
        info!(
            audience_name,
            expression = %audience.segment_expression,
            "Audience confirmed"
        );
        self.data.audience = Some(audience.clone());
        Ok(audience)
    }

    /// Sends the confirmed campaign data. On success the flow advances to
    /// channel and templates; on failure it stays on the audience step.
    pub async fn submit(
        &mut self,
        submitter: &dyn PayloadSubmitter,
    ) -> AudienceResult<serde_json::Value> {
        self.require_step(WizardStep::Audience)?;
        if self.data.audience.is_none() {
            return Err(AudienceError::Validation(
                "audience must be confirmed before submission".to_string(),
            ));
        }

        match submitter.submit(&self.data).await {
            Ok(response) => {
                metrics::counter!("campaign_requests.submitted").increment(1);
                self.move_to(WizardStep::ChannelTemplates)?;
                Ok(response)
            }
            Err(e) => {
                metrics::counter!("campaign_requests.failed").increment(1);
                error!(error = %e, "Campaign request submission failed");
                Err(e)
            }
        }
    }

    fn require_step(&self, expected: WizardStep) -> AudienceResult<()> {
        let current = self.current_step();
        if current == expected {
            Ok(())
        } else {
            Err(AudienceError::InvalidStep(format!(
                "expected {:?}, currently on {:?}",
                expected, current
            )))
        }
    }

    fn move_to(&mut self, to: WizardStep) -> AudienceResult<()> {
        let from = self.current_step();
        let trigger = self.machine.transition(to)?;
        info!(?from, ?to, %trigger, "Wizard step changed");
        self.history.push(StepChange {
            from,
            to,
            trigger,
            at: Utc::now(),
        });
        Ok(())
    }
}

impl Default for CampaignFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingSubmitter {
        fail: bool,
        received: Mutex<Vec<CampaignData>>,
    }

    impl RecordingSubmitter {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                received: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PayloadSubmitter for RecordingSubmitter {
        async fn submit(&self, data: &CampaignData) -> AudienceResult<serde_json::Value> {
            self.received.lock().unwrap().push(data.clone());
            if self.fail {
                Err(AudienceError::Submission {
                    status: 500,
                    message: "boom".to_string(),
                })
            } else {
                Ok(serde_json::json!({ "id": 1 }))
            }
        }
    }

    fn flow_on_audience_with_region() -> CampaignFlow {
        let mut flow = CampaignFlow::new();
        flow.choose_objective(ObjectiveKey::SorteiosPremiacoesRegionais).unwrap();
        flow.audience_mut().set_checkbox("estado", true);
        let group = &flow.audience().builder().segment().groups[0];
        let (g, c) = (group.id, group.conditions[0].id);
        flow.audience_mut().builder_mut().toggle_value(g, c, "PR", true);
        flow
    }

    #[test]
    fn test_initial_steps() {
        let flow = CampaignFlow::new();
        let steps = flow.steps();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].status, StepStatus::Current);
        assert_eq!(steps[0].label, "Objetivo");
        assert!(steps[1..].iter().all(|s| s.status == StepStatus::Pending));
    }

    #[test]
    fn test_choose_objective_advances() {
        let mut flow = CampaignFlow::new();
        flow.choose_objective(ObjectiveKey::Eventos).unwrap();
        assert_eq!(flow.current_step(), WizardStep::Audience);
        assert_eq!(
            flow.data().objective.as_ref().unwrap().objective_key,
            ObjectiveKey::Eventos
        );
        let steps = flow.steps();
        assert_eq!(steps[0].status, StepStatus::Completed);
        assert_eq!(steps[1].status, StepStatus::Current);
        assert_eq!(flow.history().len(), 1);
        assert_eq!(flow.history()[0].trigger, "objective_chosen");

        // Only valid on the objective step.
        let err = flow.choose_objective(ObjectiveKey::Eventos).unwrap_err();
        assert!(matches!(err, AudienceError::InvalidStep(_)));
    }

    #[test]
    fn test_back_keeps_objective() {
        let mut flow = CampaignFlow::new();
        flow.back().unwrap();
        assert_eq!(flow.current_step(), WizardStep::Objective);

        flow.choose_objective(ObjectiveKey::OfertasProdutos).unwrap();
        flow.back().unwrap();
        assert_eq!(flow.current_step(), WizardStep::Objective);
        assert!(flow.data().objective.is_some());
    }

    #[test]
    fn test_confirm_requires_usable_condition() {
        let mut flow = CampaignFlow::new();
        flow.choose_objective(ObjectiveKey::Eventos).unwrap();
        flow.audience_mut().set_checkbox("estado", true);

        let err = flow
            .confirm_audience("Campanha", ExpressionMode::Compatible)
            .unwrap_err();
        assert!(matches!(err, AudienceError::Validation(_)));
        assert!(flow.data().audience.is_none());
    }

    #[test]
    fn test_confirm_audience_stores_payload() {
        let mut flow = flow_on_audience_with_region();
        let audience = flow
            .confirm_audience("Campanha_Renegociacao_PR_PF", ExpressionMode::Compatible)
            .unwrap();
        assert_eq!(audience.segment_expression, "estado = 'PR'");
        assert_eq!(audience.attributes.registration_fields.state, "PR");
        assert_eq!(flow.data().audience.as_ref(), Some(&audience));
    }

    #[tokio::test]
    async fn test_submit_success_advances() {
        let mut flow = flow_on_audience_with_region();
        flow.confirm_audience("Campanha", ExpressionMode::Compatible)
            .unwrap();

        let submitter = RecordingSubmitter::new(false);
        let response = flow.submit(&submitter).await.unwrap();
        assert_eq!(response["id"], 1);
        assert_eq!(flow.current_step(), WizardStep::ChannelTemplates);
        assert_eq!(submitter.received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_stays_on_audience() {
        let mut flow = flow_on_audience_with_region();
        flow.confirm_audience("Campanha", ExpressionMode::Compatible)
            .unwrap();

        let submitter = RecordingSubmitter::new(true);
        let err = flow.submit(&submitter).await.unwrap_err();
        assert!(matches!(err, AudienceError::Submission { status: 500, .. }));
        assert_eq!(flow.current_step(), WizardStep::Audience);
    }

    #[tokio::test]
    async fn test_submit_requires_confirmation() {
        let mut flow = flow_on_audience_with_region();
        let submitter = RecordingSubmitter::new(false);
        let err = flow.submit(&submitter).await.unwrap_err();
        assert!(matches!(err, AudienceError::Validation(_)));
        assert!(submitter.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_editing_after_confirm_requires_new_confirmation() {
        let mut flow = flow_on_audience_with_region();
        flow.confirm_audience("Campanha", ExpressionMode::Compatible)
            .unwrap();

        flow.audience_mut().set_checkbox("estado", false);
        assert!(flow.audience().builder().is_empty());
        assert!(flow.data().audience.is_none());

        let submitter = RecordingSubmitter::new(false);
        let err = flow.submit(&submitter).await.unwrap_err();
        assert!(matches!(err, AudienceError::Validation(_)));
        assert!(submitter.received.lock().unwrap().is_empty());
        assert_eq!(flow.current_step(), WizardStep::Audience);
    }

    #[tokio::test]
    async fn test_reconfirmed_edit_is_what_gets_sent() {
        let mut flow = flow_on_audience_with_region();
        flow.confirm_audience("Campanha", ExpressionMode::Compatible)
            .unwrap();

        let group = &flow.audience().builder().segment().groups[0];
        let (g, c) = (group.id, group.conditions[0].id);
        flow.audience_mut()
            .builder_mut()
            .toggle_value(g, c, "SP", true);
        flow.confirm_audience("Campanha", ExpressionMode::Compatible)
            .unwrap();

        let submitter = RecordingSubmitter::new(false);
        flow.submit(&submitter).await.unwrap();
        let received = submitter.received.lock().unwrap();
        let sent = received[0].audience.as_ref().unwrap();
        assert_eq!(sent.segment_expression, "estado IN ('PR','SP')");
    }
}
