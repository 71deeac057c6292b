use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::routing::LeadRouting;
use super::scoring::{Grade, LeadScore};
use crate::workflows::intake::FormData;

/// Identifier wrapper for scored leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LeadId(pub String);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Scored,
    HandedOff,
    /// Stored, but the CRM never acknowledged it.
    HandoffFailed,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LeadStatus::Scored => "scored",
            LeadStatus::HandedOff => "handed_off",
            LeadStatus::HandoffFailed => "handoff_failed",
        }
    }

    /// Whether the lead belongs in the follow-up queue.
    pub const fn awaits_follow_up(self) -> bool {
        matches!(self, LeadStatus::HandedOff | LeadStatus::HandoffFailed)
    }
}

/// Repository record holding the answers, their assessment and hand-off state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub lead_id: LeadId,
    pub answers: FormData,
    pub score: LeadScore,
    pub routing: LeadRouting,
    pub summary: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
}

impl LeadRecord {
    pub fn status_view(&self) -> LeadStatusView {
        LeadStatusView {
            lead_id: self.lead_id.clone(),
            status: self.status.label(),
            grade: self.score.grade,
            total_score: self.score.total_score,
            approval_probability: self.score.approval_probability,
            team: self.routing.team.clone(),
            follow_up: self.score.follow_up_strategy.timeframe.clone(),
            created_at: self.created_at,
        }
    }
}

/// Storage abstraction so the service can be exercised without a database.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError>;
    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError>;
    /// Leads still awaiting follow-up, most urgent first.
    fn pending(&self, limit: usize) -> Result<Vec<LeadRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("lead already exists")]
    Conflict,
    #[error("lead not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound CRM hook receiving scored leads.
pub trait CrmNotifier: Send + Sync {
    fn notify(&self, handoff: CrmHandoff) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmHandoff {
    pub lead_id: LeadId,
    pub team: String,
    pub follow_up_priority: u8,
    pub summary: String,
    pub details: BTreeMap<String, String>,
}

impl CrmHandoff {
    pub fn from_record(record: &LeadRecord) -> Self {
        let mut details = BTreeMap::new();
        details.insert("grade".to_string(), record.score.grade.to_string());
        details.insert(
            "total_score".to_string(),
            record.score.total_score.to_string(),
        );
        details.insert(
            "assign_to".to_string(),
            record.routing.assign_to.clone(),
        );
        details.insert(
            "follow_up".to_string(),
            record.score.follow_up_strategy.timeframe.clone(),
        );
        if record.routing.special_handling {
            details.insert("special_handling".to_string(), "true".to_string());
        }

        Self {
            lead_id: record.lead_id.clone(),
            team: record.routing.team.clone(),
            follow_up_priority: record.score.follow_up_strategy.priority,
            summary: record.summary.clone(),
            details,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("crm transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized view returned by the API; contact details stay in the repository.
#[derive(Debug, Clone, Serialize)]
pub struct LeadStatusView {
    pub lead_id: LeadId,
    pub status: &'static str,
    pub grade: Grade,
    pub total_score: u8,
    pub approval_probability: u8,
    pub team: String,
    pub follow_up: String,
    pub created_at: DateTime<Utc>,
}
