use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::domain::{
    AttendanceEntry, AttendanceRegister, AttendanceStatus, CalendarEvent, Department,
    DepartmentId, Employee, EmployeeCode, EmployeeId, EventId, LeaveId, LeaveRequest,
    LeaveStatus, Month, Payslip, SalaryId, SalaryRecord, SalaryStatus,
};
use super::store::{is_pending_in, RecordStore, StoreError};
use super::validation::{DepartmentDraft, EmployeeDraft, NewEvent, NewLeave, NewSalary};

/// JSON client for a backend exposing the `/api/*` collections.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeePayload<'a> {
    #[serde(rename = "empId")]
    code: &'a EmployeeCode,
    #[serde(flatten)]
    draft: &'a EmployeeDraft,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttendancePayload {
    date: NaiveDate,
    employee_id: EmployeeId,
    status: AttendanceStatus,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound),
            StatusCode::CONFLICT => Err(StoreError::Conflict),
            _ => Ok(response.error_for_status()?),
        }
    }

    async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, StoreError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode_list(path, response.json().await?)
    }

    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(%method, path, "writing record");
        let response = self.send(self.request(method, path).json(body)).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        debug!(path, "deleting record");
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    async fn put_salary_status(
        &self,
        mut record: SalaryRecord,
        status: SalaryStatus,
    ) -> Result<SalaryRecord, StoreError> {
        record.status = status;
        let path = format!("salaries/{}", record.id);
        self.write(Method::PUT, &path, &record).await
    }
}

/// Anything other than a JSON array reads as an empty collection.
fn decode_list<T: DeserializeOwned>(path: &str, body: Value) -> Result<Vec<T>, StoreError> {
    match body {
        Value::Array(_) => Ok(serde_json::from_value(body)?),
        other => {
            warn!(path, kind = value_kind(&other), "expected a JSON array; using empty list");
            Ok(Vec::new())
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl RecordStore for HttpStore {
    async fn employees(&self) -> Result<Vec<Employee>, StoreError> {
        self.list("employees").await
    }

    async fn departments(&self) -> Result<Vec<Department>, StoreError> {
        self.list("departments").await
    }

    async fn leaves(&self) -> Result<Vec<LeaveRequest>, StoreError> {
        self.list("leaves").await
    }

    async fn salaries(&self) -> Result<Vec<SalaryRecord>, StoreError> {
        self.list("salaries").await
    }

    async fn events(&self) -> Result<Vec<CalendarEvent>, StoreError> {
        self.list("events").await
    }

    async fn payslips(&self) -> Result<Vec<Payslip>, StoreError> {
        self.list("payslips").await
    }

    async fn attendance_log(&self) -> Result<Vec<AttendanceEntry>, StoreError> {
        self.list("attendance/me").await
    }

    async fn attendance_register(&self) -> Result<AttendanceRegister, StoreError> {
        let response = self.send(self.request(Method::GET, "attendance")).await?;
        let body: Value = response.json().await?;
        match body {
            Value::Object(_) => Ok(serde_json::from_value(body)?),
            _ => Ok(AttendanceRegister::default()),
        }
    }

    async fn add_employee(
        &self,
        code: EmployeeCode,
        draft: EmployeeDraft,
    ) -> Result<Employee, StoreError> {
        let payload = EmployeePayload {
            code: &code,
            draft: &draft,
        };
        self.write(Method::POST, "employees", &payload).await
    }

    async fn update_employee(
        &self,
        id: EmployeeId,
        draft: EmployeeDraft,
    ) -> Result<Employee, StoreError> {
        self.write(Method::PUT, &format!("employees/{id}"), &draft)
            .await
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<(), StoreError> {
        self.delete(&format!("employees/{id}")).await
    }

    async fn add_department(&self, draft: DepartmentDraft) -> Result<Department, StoreError> {
        self.write(Method::POST, "departments", &draft).await
    }

    async fn update_department(
        &self,
        id: DepartmentId,
        draft: DepartmentDraft,
    ) -> Result<Department, StoreError> {
        self.write(Method::PUT, &format!("departments/{id}"), &draft)
            .await
    }

    async fn delete_department(&self, id: DepartmentId) -> Result<(), StoreError> {
        self.delete(&format!("departments/{id}")).await
    }

    async fn submit_leave(&self, leave: NewLeave) -> Result<LeaveRequest, StoreError> {
        self.write(Method::POST, "leaves", &leave).await
    }

    async fn decide_leave(
        &self,
        id: LeaveId,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, StoreError> {
        let body = json!({ "status": status });
        self.write(Method::PATCH, &format!("leaves/{id}"), &body)
            .await
    }

    async fn delete_leave(&self, id: LeaveId) -> Result<(), StoreError> {
        self.delete(&format!("leaves/{id}")).await
    }

    async fn add_salary(&self, salary: NewSalary) -> Result<SalaryRecord, StoreError> {
        let body = json!({
            "employeeName": salary.employee_name,
            "department": salary.department,
            "month": salary.month,
            "amount": salary.amount,
            "status": SalaryStatus::Pending,
        });
        self.write(Method::POST, "salaries", &body).await
    }

    async fn mark_salary_paid(&self, id: SalaryId) -> Result<SalaryRecord, StoreError> {
        let record = self
            .salaries()
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(StoreError::NotFound)?;
        self.put_salary_status(record, SalaryStatus::Paid).await
    }

    async fn mark_month_paid(&self, month: Month) -> Result<usize, StoreError> {
        let pending: Vec<_> = self
            .salaries()
            .await?
            .into_iter()
            .filter(|record| is_pending_in(record, month))
            .collect();
        let count = pending.len();
        for record in pending {
            self.put_salary_status(record, SalaryStatus::Paid).await?;
        }
        Ok(count)
    }

    async fn delete_salary(&self, id: SalaryId) -> Result<(), StoreError> {
        self.delete(&format!("salaries/{id}")).await
    }

    async fn add_event(&self, event: NewEvent) -> Result<CalendarEvent, StoreError> {
        self.write(Method::POST, "events", &event).await
    }

    async fn delete_event(&self, id: EventId) -> Result<(), StoreError> {
        self.delete(&format!("events/{id}")).await
    }

    async fn mark_attendance(
        &self,
        date: NaiveDate,
        employee: EmployeeId,
        status: AttendanceStatus,
    ) -> Result<(), StoreError> {
        let payload = AttendancePayload {
            date,
            employee_id: employee,
            status,
        };
        debug!(%date, %employee, "marking attendance");
        self.send(self.request(Method::POST, "attendance").json(&payload))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_collection_paths() {
        let store = HttpStore::new("http://backend:8080/", Duration::from_secs(1))
            .expect("client builds");
        assert_eq!(store.url("employees"), "http://backend:8080/api/employees");
        assert_eq!(store.url("/leaves/4"), "http://backend:8080/api/leaves/4");
    }

    #[test]
    fn employee_payload_carries_code_and_password() {
        let code = EmployeeCode("EMP006".to_string());
        let draft = EmployeeDraft {
            name: "Neha".to_string(),
            department: "IT".to_string(),
            password: "secret1".to_string(),
            ..EmployeeDraft::default()
        };
        let json = serde_json::to_value(EmployeePayload {
            code: &code,
            draft: &draft,
        })
        .expect("serializes");
        assert_eq!(json["empId"], "EMP006");
        assert_eq!(json["password"], "secret1");
        assert_eq!(json["name"], "Neha");
    }

    #[test]
    fn non_array_collections_read_as_empty() {
        for body in [json!({ "error": "down" }), Value::Null, json!("employees")] {
            let decoded: Vec<Employee> = decode_list("employees", body).expect("decodes");
            assert!(decoded.is_empty());
        }
    }

    #[test]
    fn array_collections_decode_backend_records() {
        let salaries: Vec<SalaryRecord> = decode_list(
            "salaries",
            json!([{
                "id": 4,
                "employeeName": "Ravi",
                "month": "May 2025",
                "amount": 45000,
                "status": "UNPAID"
            }]),
        )
        .expect("decodes");
        assert_eq!(salaries[0].month, Month::May);
        assert_eq!(salaries[0].status, SalaryStatus::Pending);

        let malformed = decode_list::<SalaryRecord>("salaries", json!([{ "id": "x" }]));
        assert!(matches!(malformed, Err(StoreError::Decode(_))));
    }
}
