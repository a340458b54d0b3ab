use crate::cli::ServeArgs;
use crate::demo::{build_demo_service, seed_roster};
use crate::infra::AppState;
use crate::routes::with_clearance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use clearance::config::AppConfig;
use clearance::error::AppError;
use clearance::telemetry;
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

    let (service, admins) = build_demo_service();
    if args.seed || config.demo.seed_on_start {
        let today = Local::now().date_naive();
        let staff = seed_roster(&service, &admins, today)?;
        info!(staff = staff.len(), "seeded demo roster");
    }

    let app = with_clearance_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "clearance service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
