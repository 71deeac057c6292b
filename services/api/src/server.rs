use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLeadRepository, LoggingCrmNotifier};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use mortgage_intake::config::AppConfig;
use mortgage_intake::error::AppError;
use mortgage_intake::telemetry;
use mortgage_intake::workflows::leads::LeadIntakeService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let lead_service = Arc::new(LeadIntakeService::new(
        Arc::new(InMemoryLeadRepository::default()),
        Arc::new(LoggingCrmNotifier),
        &config.wizard,
    ));

    let app = with_service_routes(lead_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        total_steps = config.wizard.total_steps,
        "rate wizard service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
