//! Lead scoring, routing and CRM hand-off for completed rate wizard sessions.

pub mod export;
pub mod repository;
pub mod router;
pub mod routing;
pub mod scoring;
pub mod service;
pub mod summary;

#[cfg(test)]
mod tests;

pub use export::{export_csv, export_csv_to_path, LeadExportError};
pub use repository::{
    CrmHandoff, CrmNotifier, LeadId, LeadRecord, LeadRepository, LeadStatus, LeadStatusView,
    NotifyError, RepositoryError,
};
pub use router::lead_router;
pub use routing::{get_lead_routing, LeadRouting, RoutingTier};
pub use scoring::{
    calculate_lead_score, ContactMethod, FollowUpStrategy, Grade, LeadScore, LeadScorer, Priority,
    QualityFactor, QualityFactors, ScoreComponent,
};
pub use service::{LeadIntakeService, LeadServiceError};
pub use summary::generate_lead_summary;
