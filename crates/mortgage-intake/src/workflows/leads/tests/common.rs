use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::WizardConfig;
use crate::workflows::intake::{
    CreditHistory, CreditScoreBracket, CurrentMortgages, EmploymentStatus, FormData,
    LoanAmountBracket, LoanPurpose, PropertyType, PropertyUsage, PropertyValueBracket, Province,
};
use crate::workflows::leads::repository::{
    CrmHandoff, CrmNotifier, LeadId, LeadRecord, LeadRepository, NotifyError, RepositoryError,
};
use crate::workflows::leads::{lead_router, LeadIntakeService};

/// Every base step answered, contact complete, no conditional steps switched on.
pub(super) fn happy_answers() -> FormData {
    let mut answers = FormData::default();
    let loan = &mut answers.loan_details;
    loan.is_homeowner = Some(true);
    loan.property_type = Some(PropertyType::SingleFamily);
    loan.property_usage = Some(PropertyUsage::PrimaryHome);
    loan.property_value = Some(PropertyValueBracket::From600kTo900k);
    loan.current_mortgages = Some(CurrentMortgages::PaidOff);
    loan.loan_amount = Some(LoanAmountBracket::From100kTo200k);
    loan.loan_purpose = Some(LoanPurpose::HomeImprovement);
    loan.credit_history = Some(CreditHistory::NoIssues);
    loan.credit_score = Some(CreditScoreBracket::Excellent);
    loan.province = Some(Province::BritishColumbia);

    answers.personal_info.first_name = "Jordan".to_string();
    answers.personal_info.last_name = "Tremblay".to_string();
    answers.personal_info.email = "jordan.tremblay@example.ca".to_string();
    answers.personal_info.phone = "(604) 555-0143".to_string();
    answers.supplemental.employer_name = Some("Coastal Timber Ltd".to_string());
    answers
}

/// Defaults plus the answers a homeowner gives on the shortest path to a quote.
pub(super) fn minimal_answers() -> FormData {
    let mut answers = FormData::default();
    answers.loan_details.is_homeowner = Some(true);
    answers.loan_details.property_type = Some(PropertyType::SingleFamily);
    answers.loan_details.property_usage = Some(PropertyUsage::PrimaryHome);
    answers.loan_details.credit_score = Some(CreditScoreBracket::Excellent);
    answers.personal_info.email = "sam@example.com".to_string();
    answers.personal_info.phone = "416-555-0199".to_string();
    answers
}

pub(super) fn low_quality_answers() -> FormData {
    let mut answers = FormData::default();
    answers.financial_info.employment_status = Some(EmploymentStatus::Unemployed);
    answers.loan_details.credit_score = Some(CreditScoreBracket::NeedsWork);
    answers.loan_details.credit_history = Some(CreditHistory::Bankruptcy);
    answers.personal_info.email = "maybe@example.com".to_string();
    answers
}

pub(super) fn build_service() -> (
    LeadIntakeService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = LeadIntakeService::new(
        repository.clone(),
        notifier.clone(),
        &WizardConfig::default(),
    );
    (service, repository, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl LeadRepository for MemoryRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.lead_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.lead_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.lead_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<LeadRecord> = guard
            .values()
            .filter(|record| record.status.awaits_follow_up())
            .cloned()
            .collect();
        records.sort_by(|left, right| {
            left.score
                .follow_up_strategy
                .priority
                .cmp(&right.score.follow_up_strategy.priority)
                .then(left.created_at.cmp(&right.created_at))
        });
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<CrmHandoff>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<CrmHandoff> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl CrmNotifier for MemoryNotifier {
    fn notify(&self, handoff: CrmHandoff) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(handoff);
        Ok(())
    }
}

pub(super) struct OfflineNotifier;

impl CrmNotifier for OfflineNotifier {
    fn notify(&self, _handoff: CrmHandoff) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("crm webhook timed out".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl LeadRepository for ConflictRepository {
    fn insert(&self, _record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: LeadRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        Ok(None)
    }

    fn pending(&self, _limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl LeadRepository for UnavailableRepository {
    fn insert(&self, _record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: LeadRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn pending(&self, _limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn lead_router_with_service(
    service: LeadIntakeService<MemoryRepository, MemoryNotifier>,
) -> axum::Router {
    lead_router(Arc::new(service))
}
