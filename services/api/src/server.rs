use crate::cli::ServeArgs;
use crate::infra::{open_store, override_data_source, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ems::config::AppConfig;
use ems::error::AppError;
use ems::export::ReportExporter;
use ems::records::{RecordChange, RecordService};
use ems::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    config.data_source = override_data_source(
        &config.data_source,
        args.source.data_source.as_deref(),
        args.source.base_url.take(),
    )?;

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = open_store(&config.data_source)?;
    let service = Arc::new(RecordService::new(store));
    tokio::spawn(log_changes(service.subscribe()));

    let exporter = ReportExporter::new(config.reporting.currency_symbol.clone());
    let app = with_service_routes(service, exporter)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        data_source = config.data_source.label(),
        %addr,
        "employee management service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

async fn log_changes(mut changes: broadcast::Receiver<RecordChange>) {
    loop {
        match changes.recv().await {
            Ok(change) => debug!(?change, "record change"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "change log fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
