use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use ems::export::ReportExporter;
use ems::records::{record_router, RecordService, RecordStore};
use ems::reports::report_router;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<S>(
    service: Arc<RecordService<S>>,
    exporter: ReportExporter,
) -> axum::Router
where
    S: RecordStore + ?Sized + 'static,
{
    record_router(service.clone())
        .merge(report_router(service, exporter))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use ems::records::FixtureStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let store: Arc<dyn RecordStore> = Arc::new(FixtureStore::seeded());
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_service_routes(Arc::new(RecordService::new(store)), ReportExporter::default())
            .layer(Extension(state))
    }

    async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    #[tokio::test]
    async fn readiness_reflects_startup_flag() {
        assert_eq!(
            get(app(false), "/ready").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(get(app(true), "/ready").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn record_and_report_routes_share_one_store() {
        let response = get(app(true), "/api/v1/employees").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(app(true), "/api/v1/reports/summary?q=hr").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(json["summary"]["totalRecords"], 2);
        assert_eq!(json["charts"]["monthly"].as_array().map(Vec::len), Some(12));
    }

    #[tokio::test]
    async fn pdf_export_downloads_as_attachment() {
        let response = get(app(true), "/api/v1/reports/department/export?format=pdf").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"department-report.pdf\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert!(body.starts_with(b"%PDF"));
    }
}
