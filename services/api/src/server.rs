use crate::cli::ServeArgs;
use crate::infra::{build_marketplace, cors_layer, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use saarthi_jobs::config::AppConfig;
use saarthi_jobs::error::AppError;
use saarthi_jobs::marketplace::marketplace_router;
use saarthi_jobs::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let marketplace = build_marketplace(&config)?;
    let app = with_operational_routes(marketplace_router(marketplace))
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.auth))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        public_url = %config.server.public_url,
        "saarthi marketplace ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
