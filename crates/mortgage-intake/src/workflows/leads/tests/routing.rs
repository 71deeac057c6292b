use super::common::*;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::WizardConfig;
use crate::workflows::leads::router::{status_handler, submit_handler};
use crate::workflows::intake::{calculate_estimated_time, FormData};
use crate::workflows::leads::LeadIntakeService;

fn post_json(uri: &str, body: &Value) -> Request<axum::body::Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize request"),
        ))
        .expect("request builds")
}

#[tokio::test]
async fn submit_route_accepts_complete_answers() {
    let (service, repository, notifier) = build_service();
    let router = lead_router_with_service(service);

    let body = serde_json::to_value(happy_answers()).expect("answers serialize");
    let response = router
        .oneshot(post_json("/api/v1/leads", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "handed_off");
    assert_eq!(payload["grade"], "A");
    assert_eq!(payload["team"], "High-Value Team");
    assert!(payload.get("email").is_none());
    assert_eq!(repository.len(), 1);
    assert_eq!(notifier.events().len(), 1);
}

#[tokio::test]
async fn submit_handler_returns_unprocessable_with_field_errors() {
    let (service, repository, _) = build_service();
    let mut answers = happy_answers();
    answers.personal_info.email = "not-an-email".to_string();

    let response = submit_handler::<MemoryRepository, MemoryNotifier>(
        State(Arc::new(service)),
        axum::Json(answers),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["errors"]["email"], "Please enter a valid email address");
    assert_eq!(repository.len(), 0);
}

#[tokio::test]
async fn submit_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(LeadIntakeService::new(
        Arc::new(ConflictRepository),
        Arc::new(MemoryNotifier::default()),
        &WizardConfig::default(),
    ));

    let response = submit_handler::<ConflictRepository, MemoryNotifier>(
        State(service),
        axum::Json(happy_answers()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn submit_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(LeadIntakeService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        &WizardConfig::default(),
    ));

    let response = submit_handler::<UnavailableRepository, MemoryNotifier>(
        State(service),
        axum::Json(happy_answers()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn status_handler_returns_found_records() {
    let (service, _, _) = build_service();
    let service = Arc::new(service);
    let record = service.submit(happy_answers()).expect("submission succeeds");

    let response = status_handler::<MemoryRepository, MemoryNotifier>(
        State(service),
        Path(record.lead_id.0.clone()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["lead_id"], record.lead_id.0);
    assert_eq!(payload["total_score"], 94);
}

#[tokio::test]
async fn status_handler_returns_not_found_for_unknown_lead() {
    let (service, _, _) = build_service();

    let response = status_handler::<MemoryRepository, MemoryNotifier>(
        State(Arc::new(service)),
        Path("lead-missing".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["lead_id"], "lead-missing");
}

#[tokio::test]
async fn steps_route_includes_conditional_steps_for_answers() {
    let (service, _, _) = build_service();
    let router = lead_router_with_service(service);

    let body = json!({
        "loanDetails": { "currentMortgages": "one-mortgage" },
        "financialInfo": { "employmentStatus": "self-employed" }
    });
    let response = router
        .oneshot(post_json("/api/v1/wizard/steps", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let numbers: Vec<Value> = payload["steps"]
        .as_array()
        .expect("steps array")
        .iter()
        .map(|step| step["stepNumber"].clone())
        .collect();
    assert!(numbers.contains(&json!(5.5)));
    assert!(numbers.contains(&json!(9.5)));
    assert!(!numbers.contains(&json!(7.5)));
    assert_eq!(numbers.len(), 13);
    let answers: FormData = serde_json::from_value(body).expect("answers parse");
    assert_eq!(
        payload["estimatedTime"],
        json!(calculate_estimated_time(&answers))
    );
}

#[tokio::test]
async fn steps_route_times_only_the_configured_flow() {
    let config = WizardConfig {
        total_steps: 4,
        ..WizardConfig::default()
    };
    let service = LeadIntakeService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryNotifier::default()),
        &config,
    );
    let expected = service.estimated_minutes(&FormData::default());
    let router = lead_router_with_service(service);

    let response = router
        .oneshot(post_json("/api/v1/wizard/steps", &json!({})))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    let listed: u64 = payload["steps"]
        .as_array()
        .expect("steps array")
        .iter()
        .filter_map(|step| step["estimatedTime"].as_u64())
        .sum();
    assert_eq!(payload["estimatedTime"], json!(expected));
    assert_eq!(listed, u64::from(expected));
    assert!(expected < calculate_estimated_time(&FormData::default()));
}

#[tokio::test]
async fn validate_route_reports_step_errors() {
    let (service, _, _) = build_service();
    let router = lead_router_with_service(service);

    let body = json!({ "step": 11, "answers": {} });
    let response = router
        .oneshot(post_json("/api/v1/wizard/validate", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["step"], 11);
    assert_eq!(payload["valid"], false);
    assert_eq!(payload["errors"]["email"], "Email is required");
}

#[tokio::test]
async fn validate_route_rejects_positions_outside_flow() {
    let (service, _, _) = build_service();
    let router = lead_router_with_service(service);

    let body = json!({ "step": 14, "answers": {} });
    let response = router
        .oneshot(post_json("/api/v1/wizard/validate", &body))
        .await
        .expect("route executes");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn score_route_returns_routing_and_summary() {
    let (service, repository, _) = build_service();
    let router = lead_router_with_service(service);

    let body = serde_json::to_value(minimal_answers()).expect("answers serialize");
    let response = router
        .oneshot(post_json("/api/v1/wizard/score", &body))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"]["totalScore"], 77);
    assert_eq!(payload["routing"]["team"], "Primary Team");
    assert!(payload["summary"]
        .as_str()
        .is_some_and(|summary| summary.contains("SCORING")));
    assert_eq!(repository.len(), 0);
}
