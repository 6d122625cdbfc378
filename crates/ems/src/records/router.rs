use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    AdminProfile, AttendanceStatus, DepartmentId, EmployeeId, EventId, LeaveId, LeaveStatus,
    Month, SalaryId,
};
use super::service::{RecordService, RecordServiceError};
use super::store::{RecordStore, StoreError};
use super::validation::{DepartmentDraft, EmployeeDraft, EventDraft, LeaveDraft, SalaryDraft};

type Service<S> = State<Arc<RecordService<S>>>;

/// Router exposing CRUD endpoints for every record collection.
pub fn record_router<S>(service: Arc<RecordService<S>>) -> Router
where
    S: RecordStore + ?Sized + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees",
            get(list_employees::<S>).post(add_employee::<S>),
        )
        .route(
            "/api/v1/employees/:id",
            put(update_employee::<S>).delete(delete_employee::<S>),
        )
        .route(
            "/api/v1/departments",
            get(list_departments::<S>).post(add_department::<S>),
        )
        .route(
            "/api/v1/departments/:id",
            put(update_department::<S>).delete(delete_department::<S>),
        )
        .route(
            "/api/v1/leaves",
            get(list_leaves::<S>).post(submit_leave::<S>),
        )
        .route(
            "/api/v1/leaves/:id",
            patch(decide_leave::<S>).delete(delete_leave::<S>),
        )
        .route(
            "/api/v1/salaries",
            get(list_salaries::<S>).post(add_salary::<S>),
        )
        .route("/api/v1/salaries/mark-all-paid", patch(mark_month_paid::<S>))
        .route("/api/v1/salaries/:id", delete(delete_salary::<S>))
        .route("/api/v1/salaries/:id/paid", patch(mark_salary_paid::<S>))
        .route(
            "/api/v1/events",
            get(list_events::<S>).post(add_event::<S>),
        )
        .route("/api/v1/events/:id", delete(delete_event::<S>))
        .route("/api/v1/attendance", post(mark_attendance::<S>))
        .route("/api/v1/attendance/summary", get(attendance_summary::<S>))
        .route("/api/v1/payslips", get(list_payslips::<S>))
        .route(
            "/api/v1/profile",
            get(show_profile::<S>).put(update_profile::<S>),
        )
        .with_state(service)
}

impl IntoResponse for RecordServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            RecordServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RecordServiceError::Transition(_) | RecordServiceError::Store(StoreError::Conflict) => {
                StatusCode::CONFLICT
            }
            RecordServiceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            RecordServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let payload = json!({ "error": self.to_string() });
        (status, Json(payload)).into_response()
    }
}

fn created<T: serde::Serialize>(value: T) -> Response {
    (StatusCode::CREATED, Json(value)).into_response()
}

pub(crate) async fn list_employees<S>(State(service): Service<S>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.employees().await {
        Ok(employees) => Json(employees).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn add_employee<S>(
    State(service): Service<S>,
    Json(draft): Json<EmployeeDraft>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.add_employee(draft).await {
        Ok(employee) => created(employee),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_employee<S>(
    State(service): Service<S>,
    Path(id): Path<u64>,
    Json(draft): Json<EmployeeDraft>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.update_employee(EmployeeId(id), draft).await {
        Ok(employee) => Json(employee).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_employee<S>(State(service): Service<S>, Path(id): Path<u64>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.delete_employee(EmployeeId(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_departments<S>(State(service): Service<S>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.departments().await {
        Ok(departments) => Json(departments).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn add_department<S>(
    State(service): Service<S>,
    Json(draft): Json<DepartmentDraft>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.add_department(draft).await {
        Ok(department) => created(department),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_department<S>(
    State(service): Service<S>,
    Path(id): Path<u64>,
    Json(draft): Json<DepartmentDraft>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.update_department(DepartmentId(id), draft).await {
        Ok(department) => Json(department).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_department<S>(
    State(service): Service<S>,
    Path(id): Path<u64>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.delete_department(DepartmentId(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_leaves<S>(State(service): Service<S>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.leaves().await {
        Ok(leaves) => Json(leaves).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn submit_leave<S>(
    State(service): Service<S>,
    Json(draft): Json<LeaveDraft>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.submit_leave(draft).await {
        Ok(leave) => created(leave),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LeaveDecision {
    pub(crate) status: LeaveStatus,
}

pub(crate) async fn decide_leave<S>(
    State(service): Service<S>,
    Path(id): Path<u64>,
    Json(decision): Json<LeaveDecision>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.decide_leave(LeaveId(id), decision.status).await {
        Ok(leave) => Json(leave).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_leave<S>(State(service): Service<S>, Path(id): Path<u64>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.delete_leave(LeaveId(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_salaries<S>(State(service): Service<S>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.salaries().await {
        Ok(salaries) => Json(salaries).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn add_salary<S>(
    State(service): Service<S>,
    Json(draft): Json<SalaryDraft>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.add_salary(draft).await {
        Ok(record) => created(record),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn mark_salary_paid<S>(
    State(service): Service<S>,
    Path(id): Path<u64>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.mark_salary_paid(SalaryId(id)).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MonthSelection {
    pub(crate) month: Month,
}

pub(crate) async fn mark_month_paid<S>(
    State(service): Service<S>,
    Json(selection): Json<MonthSelection>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.mark_month_paid(selection.month).await {
        Ok(updated) => {
            Json(json!({ "month": selection.month, "updated": updated })).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_salary<S>(State(service): Service<S>, Path(id): Path<u64>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.delete_salary(SalaryId(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_events<S>(State(service): Service<S>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.events().await {
        Ok(events) => Json(events).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn add_event<S>(
    State(service): Service<S>,
    Json(draft): Json<EventDraft>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.add_event(draft).await {
        Ok(event) => created(event),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn delete_event<S>(State(service): Service<S>, Path(id): Path<u64>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.delete_event(EventId(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttendanceMarkRequest {
    pub(crate) date: NaiveDate,
    pub(crate) employee_id: EmployeeId,
    pub(crate) status: AttendanceStatus,
}

pub(crate) async fn mark_attendance<S>(
    State(service): Service<S>,
    Json(request): Json<AttendanceMarkRequest>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    let AttendanceMarkRequest {
        date,
        employee_id,
        status,
    } = request;
    match service.mark_attendance(date, employee_id, status).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SummaryQuery {
    #[serde(default)]
    pub(crate) employee: Option<u64>,
}

pub(crate) async fn attendance_summary<S>(
    State(service): Service<S>,
    Query(query): Query<SummaryQuery>,
) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.attendance_summary(query.employee.map(EmployeeId)).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn list_payslips<S>(State(service): Service<S>) -> Response
where
    S: RecordStore + ?Sized + 'static,
{
    match service.payslips().await {
        Ok(payslips) => Json(payslips).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn show_profile<S>(State(service): Service<S>) -> Json<AdminProfile>
where
    S: RecordStore + ?Sized + 'static,
{
    Json(service.profile())
}

pub(crate) async fn update_profile<S>(
    State(service): Service<S>,
    Json(profile): Json<AdminProfile>,
) -> Json<AdminProfile>
where
    S: RecordStore + ?Sized + 'static,
{
    Json(service.update_profile(profile))
}
