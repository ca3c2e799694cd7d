use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cheapshark_skill::config::AppConfig;
use cheapshark_skill::deals::CheapSharkClient;
use cheapshark_skill::error::AppError;
use cheapshark_skill::skill::SkillDispatcher;
use cheapshark_skill::telemetry;
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

    let endpoint = config.deals.endpoint.clone();
    let client = Arc::new(CheapSharkClient::new(config.deals.clone())?);
    let dispatcher = Arc::new(SkillDispatcher::standard(client));

    let app = with_service_routes(dispatcher)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, deals_endpoint = %endpoint, "cheapshark skill ready");

    axum::serve(listener, app).await?;
    Ok(())
}
