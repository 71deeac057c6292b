use metrics_exporter_prometheus::PrometheusHandle;
use mortgage_intake::workflows::leads::{
    CrmHandoff, CrmNotifier, LeadId, LeadRecord, LeadRepository, NotifyError, RepositoryError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    records: Arc<Mutex<HashMap<LeadId, LeadRecord>>>,
}

impl InMemoryLeadRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<LeadId, LeadRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }

    pub(crate) fn all(&self) -> Result<Vec<LeadRecord>, RepositoryError> {
        let mut records: Vec<LeadRecord> = self.lock()?.values().cloned().collect();
        records.sort_by(|left, right| left.lead_id.cmp(&right.lead_id));
        Ok(records)
    }
}

impl LeadRepository for InMemoryLeadRepository {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.lead_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.lead_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.lead_id) {
            guard.insert(record.lead_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn pending(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError> {
        let mut records: Vec<LeadRecord> = self
            .lock()?
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

/// CRM stand-in that writes each hand-off to the log.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoggingCrmNotifier;

impl CrmNotifier for LoggingCrmNotifier {
    fn notify(&self, handoff: CrmHandoff) -> Result<(), NotifyError> {
        let payload = serde_json::to_string(&handoff)
            .map_err(|err| NotifyError::Transport(format!("payload not serializable: {err}")))?;
        info!(
            lead_id = %handoff.lead_id,
            team = %handoff.team,
            follow_up_priority = handoff.follow_up_priority,
            %payload,
            "crm hand-off"
        );
        Ok(())
    }
}
