use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::repository::{
    CrmHandoff, CrmNotifier, LeadId, LeadRecord, LeadRepository, LeadStatus, NotifyError,
    RepositoryError,
};
use super::routing::get_lead_routing;
use super::scoring::{LeadScore, LeadScorer};
use super::summary::generate_lead_summary;
use crate::config::WizardConfig;
use crate::workflows::intake::{
    FormData, FormStep, StepFlow, StepPosition, StepValidator, ValidationErrors,
};

/// Service composing validation, scoring, routing and CRM hand-off.
pub struct LeadIntakeService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    scorer: LeadScorer,
    validator: StepValidator,
    flow: StepFlow,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

impl<R, N> LeadIntakeService<R, N>
where
    R: LeadRepository + 'static,
    N: CrmNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: &WizardConfig) -> Self {
        Self {
            repository,
            notifier,
            scorer: LeadScorer,
            validator: StepValidator::from(config),
            flow: StepFlow::new(config.total_steps),
        }
    }

    /// Step descriptors applicable to the given answers.
    pub fn steps(&self, answers: &FormData) -> Vec<FormStep> {
        self.flow.steps(answers)
    }

    pub fn estimated_minutes(&self, answers: &FormData) -> u32 {
        self.flow.estimated_minutes(answers)
    }

    pub fn validate_step(&self, answers: &FormData, position: StepPosition) -> ValidationErrors {
        self.validator.validate(answers, position)
    }

    pub fn score(&self, answers: &FormData) -> LeadScore {
        self.scorer.score(answers)
    }

    /// Validate every applicable step, score, store and hand the lead to the CRM.
    pub fn submit(&self, mut answers: FormData) -> Result<LeadRecord, LeadServiceError> {
        let errors = self.validator.validate_all(&answers, &self.flow);
        if !errors.is_empty() {
            return Err(LeadServiceError::Validation(errors));
        }
        answers.is_complete = true;

        let score = self.scorer.score(&answers);
        let routing = get_lead_routing(&score);
        let summary = generate_lead_summary(&answers, &score);

        let record = LeadRecord {
            lead_id: next_lead_id(),
            answers,
            score,
            routing,
            summary,
            status: LeadStatus::Scored,
            created_at: Utc::now(),
        };

        let mut stored = self.repository.insert(record)?;
        if let Err(err) = self.notifier.notify(CrmHandoff::from_record(&stored)) {
            warn!(lead_id = %stored.lead_id, error = %err, "crm hand-off failed");
            stored.status = LeadStatus::HandoffFailed;
            self.repository.update(stored)?;
            return Err(err.into());
        }

        stored.status = LeadStatus::HandedOff;
        self.repository.update(stored.clone())?;

        info!(
            lead_id = %stored.lead_id,
            grade = %stored.score.grade,
            team = %stored.routing.team,
            "lead handed off"
        );
        Ok(stored)
    }

    pub fn get(&self, lead_id: &LeadId) -> Result<LeadRecord, LeadServiceError> {
        let record = self
            .repository
            .fetch(lead_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn pending_follow_ups(&self, limit: usize) -> Result<Vec<LeadRecord>, LeadServiceError> {
        Ok(self.repository.pending(limit)?)
    }
}

/// Error raised by the lead intake service.
#[derive(Debug, thiserror::Error)]
pub enum LeadServiceError {
    #[error("answers failed validation on {} field(s)", .0.len())]
    Validation(ValidationErrors),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
