use crate::cli::ServeArgs;
use crate::infra::{build_engine, AppState};
use crate::routes::with_scheme_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use scheme_finder::config::AppConfig;
use scheme_finder::error::AppError;
use scheme_finder::intake::{InMemorySessionStore, IntakeService};
use scheme_finder::telemetry;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = build_engine(&config.knowledge_base)?;
    let sessions = Arc::new(InMemorySessionStore::new());
    let intake_service = Arc::new(IntakeService::new(
        sessions,
        engine.clone(),
        config.intake.clone(),
    ));

    let app = with_scheme_routes(engine.clone(), intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        schemes = engine.knowledge_base().len(),
        default_region = config.intake.default_region.as_deref().unwrap_or("ALL"),
        "scheme finder ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
