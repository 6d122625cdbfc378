use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;
use crate::export::{ExportArtifact, ExportFormat, ReportExporter, ReportSection};
use crate::records::{Month, RecordService, RecordStore, SalaryId, StoreError};

use super::analytics::DashboardCounters;
use super::views::{build_overview, ReportDataset, ReportQuery};

/// Shared state for the reporting endpoints.
pub struct ReportState<S: ?Sized> {
    pub service: Arc<RecordService<S>>,
    pub exporter: ReportExporter,
}

type Reports<S> = State<Arc<ReportState<S>>>;

pub fn report_router<S>(service: Arc<RecordService<S>>, exporter: ReportExporter) -> Router
where
    S: RecordStore + ?Sized + 'static,
{
    let state = Arc::new(ReportState { service, exporter });
    Router::new()
        .route("/api/v1/dashboard", get(dashboard::<S>))
        .route("/api/v1/reports/summary", get(summary::<S>))
        .route("/api/v1/reports/:section/export", get(export_section::<S>))
        .route("/api/v1/salaries/receipts", get(monthly_receipts::<S>))
        .route("/api/v1/salaries/:id/receipt", get(salary_receipt::<S>))
        .with_state(state)
}

impl IntoResponse for ExportArtifact {
    fn into_response(self) -> Response {
        let disposition = self.disposition();
        (
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.bytes,
        )
            .into_response()
    }
}

pub(crate) async fn dashboard<S>(State(state): Reports<S>) -> Json<DashboardCounters>
where
    S: RecordStore + ?Sized + 'static,
{
    let dataset = ReportDataset::load(&state.service).await;
    Json(DashboardCounters::compute(
        &dataset.employees,
        &dataset.departments,
        &dataset.leaves,
        &dataset.salaries,
    ))
}

pub(crate) async fn summary<S>(
    State(state): Reports<S>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    let dataset = ReportDataset::load(&state.service).await;
    Json(build_overview(&dataset, &query)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportParams {
    #[serde(default)]
    pub(crate) format: Option<String>,
    #[serde(default)]
    pub(crate) q: Option<String>,
    #[serde(default)]
    pub(crate) from: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) to: Option<NaiveDate>,
}

pub(crate) async fn export_section<S>(
    State(state): Reports<S>,
    Path(section): Path<String>,
    Query(params): Query<ExportParams>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    let requested = section
        .parse::<ReportSection>()
        .and_then(|section| {
            let format = match params.format.as_deref() {
                Some(raw) => raw.parse::<ExportFormat>()?,
                None => ExportFormat::default(),
            };
            Ok((section, format))
        });
    let (section, format) = match requested {
        Ok(pair) => pair,
        Err(err) => return AppError::from(err).into_response(),
    };

    let query = ReportQuery {
        q: params.q,
        from: params.from,
        to: params.to,
        year: None,
    };
    let dataset = ReportDataset::load(&state.service).await;
    match state.exporter.export(section, format, &dataset, &query) {
        Ok(artifact) => artifact.into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn salary_receipt<S>(State(state): Reports<S>, Path(id): Path<u64>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    let salaries = match state.service.salaries().await {
        Ok(salaries) => salaries,
        Err(err) => return AppError::from(err).into_response(),
    };
    let Some(record) = salaries.iter().find(|record| record.id == SalaryId(id)) else {
        return AppError::from(StoreError::NotFound).into_response();
    };
    match state.exporter.receipt(record) {
        Ok(artifact) => artifact.into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReceiptsParams {
    pub(crate) month: Month,
}

pub(crate) async fn monthly_receipts<S>(
    State(state): Reports<S>,
    Query(params): Query<ReceiptsParams>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    let salaries = match state.service.salaries().await {
        Ok(salaries) => salaries,
        Err(err) => return AppError::from(err).into_response(),
    };
    match state.exporter.monthly_receipts(&salaries, params.month) {
        Ok(artifact) => artifact.into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}
