use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{CrmNotifier, LeadId, LeadRepository, RepositoryError};
use super::routing::get_lead_routing;
use super::service::{LeadIntakeService, LeadServiceError};
use super::summary::generate_lead_summary;
use crate::workflows::intake::{get_dynamic_suggestions, FormData, StepPosition};

/// Router exposing the wizard helpers and lead intake endpoints.
pub fn lead_router<R, N>(service: Arc<LeadIntakeService<R, N>>) -> Router
where
    R: LeadRepository + 'static,
    N: CrmNotifier + 'static,
{
    Router::new()
        .route("/api/v1/wizard/steps", post(steps_handler::<R, N>))
        .route("/api/v1/wizard/validate", post(validate_handler::<R, N>))
        .route("/api/v1/wizard/score", post(score_handler::<R, N>))
        .route("/api/v1/leads", post(submit_handler::<R, N>))
        .route("/api/v1/leads/:lead_id", get(status_handler::<R, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidateRequest {
    pub step: StepPosition,
    #[serde(default)]
    pub answers: FormData,
}

pub(crate) async fn steps_handler<R, N>(
    State(service): State<Arc<LeadIntakeService<R, N>>>,
    Json(answers): Json<FormData>,
) -> Response
where
    R: LeadRepository + 'static,
    N: CrmNotifier + 'static,
{
    let payload = json!({
        "steps": service.steps(&answers),
        "estimatedTime": service.estimated_minutes(&answers),
        "suggestions": get_dynamic_suggestions(&answers),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn validate_handler<R, N>(
    State(service): State<Arc<LeadIntakeService<R, N>>>,
    Json(request): Json<ValidateRequest>,
) -> Response
where
    R: LeadRepository + 'static,
    N: CrmNotifier + 'static,
{
    let errors = service.validate_step(&request.answers, request.step);
    let payload = json!({
        "step": request.step,
        "valid": errors.is_empty(),
        "errors": errors,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn score_handler<R, N>(
    State(service): State<Arc<LeadIntakeService<R, N>>>,
    Json(answers): Json<FormData>,
) -> Response
where
    R: LeadRepository + 'static,
    N: CrmNotifier + 'static,
{
    let score = service.score(&answers);
    let payload = json!({
        "routing": get_lead_routing(&score),
        "summary": generate_lead_summary(&answers, &score),
        "score": score,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<LeadIntakeService<R, N>>>,
    Json(answers): Json<FormData>,
) -> Response
where
    R: LeadRepository + 'static,
    N: CrmNotifier + 'static,
{
    match service.submit(answers) {
        Ok(record) => (StatusCode::ACCEPTED, Json(record.status_view())).into_response(),
        Err(LeadServiceError::Validation(errors)) => {
            let payload = json!({
                "error": "answers failed validation",
                "errors": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(LeadServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({
                "error": "lead already exists",
            });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<LeadIntakeService<R, N>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    R: LeadRepository + 'static,
    N: CrmNotifier + 'static,
{
    let id = LeadId(lead_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(LeadServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "lead_id": id.0,
                "error": "lead not found",
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
