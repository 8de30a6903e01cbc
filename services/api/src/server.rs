use crate::cli::ServeArgs;
use crate::infra::{build_resolver, build_sink, AppState};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use gsb_index::assessment::AssessmentService;
use gsb_index::config::AppConfig;
use gsb_index::error::AppError;
use gsb_index::telemetry;
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

    let required_metrics = config.scoring.default_version.schema().metric_names();
    let resolver = build_resolver(&config, required_metrics, None)?;
    let sink = Arc::new(build_sink(&config));
    let assessment_service = Arc::new(AssessmentService::new(
        resolver,
        sink,
        config.scoring.default_version,
    )?);

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        schema_version = %config.scoring.default_version,
        "gsb index service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
