use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use super::domain::{
    AttendanceEntry, AttendanceRegister, AttendanceStatus, CalendarEvent, Department,
    DepartmentId, Employee, EmployeeCode, EmployeeId, EventId, LeaveId, LeaveRequest,
    LeaveStatus, Month, Payslip, SalaryId, SalaryRecord, SalaryStatus,
};
use super::validation::{DepartmentDraft, EmployeeDraft, NewEvent, NewLeave, NewSalary};

/// Data-access boundary. One implementation is chosen when the service starts.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn employees(&self) -> Result<Vec<Employee>, StoreError>;
    async fn departments(&self) -> Result<Vec<Department>, StoreError>;
    async fn leaves(&self) -> Result<Vec<LeaveRequest>, StoreError>;
    async fn salaries(&self) -> Result<Vec<SalaryRecord>, StoreError>;
    async fn events(&self) -> Result<Vec<CalendarEvent>, StoreError>;
    async fn payslips(&self) -> Result<Vec<Payslip>, StoreError>;
    async fn attendance_log(&self) -> Result<Vec<AttendanceEntry>, StoreError>;
    async fn attendance_register(&self) -> Result<AttendanceRegister, StoreError>;

    async fn add_employee(
        &self,
        code: EmployeeCode,
        draft: EmployeeDraft,
    ) -> Result<Employee, StoreError>;
    async fn update_employee(
        &self,
        id: EmployeeId,
        draft: EmployeeDraft,
    ) -> Result<Employee, StoreError>;
    async fn delete_employee(&self, id: EmployeeId) -> Result<(), StoreError>;

    async fn add_department(&self, draft: DepartmentDraft) -> Result<Department, StoreError>;
    async fn update_department(
        &self,
        id: DepartmentId,
        draft: DepartmentDraft,
    ) -> Result<Department, StoreError>;
    async fn delete_department(&self, id: DepartmentId) -> Result<(), StoreError>;

    async fn submit_leave(&self, leave: NewLeave) -> Result<LeaveRequest, StoreError>;
    async fn decide_leave(
        &self,
        id: LeaveId,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, StoreError>;
    async fn delete_leave(&self, id: LeaveId) -> Result<(), StoreError>;

    async fn add_salary(&self, salary: NewSalary) -> Result<SalaryRecord, StoreError>;
    async fn mark_salary_paid(&self, id: SalaryId) -> Result<SalaryRecord, StoreError>;
    /// Marks every pending record of `month` as paid and returns how many changed.
    async fn mark_month_paid(&self, month: Month) -> Result<usize, StoreError>;
    async fn delete_salary(&self, id: SalaryId) -> Result<(), StoreError>;

    async fn add_event(&self, event: NewEvent) -> Result<CalendarEvent, StoreError>;
    async fn delete_event(&self, id: EventId) -> Result<(), StoreError>;

    async fn mark_attendance(
        &self,
        date: NaiveDate,
        employee: EmployeeId,
        status: AttendanceStatus,
    ) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend payload malformed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The four collections every admin view starts from.
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    pub employees: Vec<Employee>,
    pub departments: Vec<Department>,
    pub leaves: Vec<LeaveRequest>,
    pub salaries: Vec<SalaryRecord>,
}

impl RecordSnapshot {
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
            && self.departments.is_empty()
            && self.leaves.is_empty()
            && self.salaries.is_empty()
    }
}

/// Fetches the four core collections concurrently. If any one fails, all four are
/// discarded and an empty snapshot is returned.
pub async fn load_snapshot<S>(store: &S) -> RecordSnapshot
where
    S: RecordStore + ?Sized,
{
    let joined = tokio::try_join!(
        store.employees(),
        store.departments(),
        store.leaves(),
        store.salaries(),
    );

    match joined {
        Ok((employees, departments, leaves, salaries)) => RecordSnapshot {
            employees,
            departments,
            leaves,
            salaries,
        },
        Err(err) => {
            warn!(error = %err, "record snapshot unavailable; falling back to empty collections");
            RecordSnapshot::default()
        }
    }
}

/// Monotonic identifier source, seeded above the largest identifier already in use.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    pub fn starting_after(max_existing: u64) -> Self {
        Self {
            next: AtomicU64::new(max_existing.saturating_add(1)),
        }
    }

    pub fn seeded_from<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        Self::starting_after(existing.into_iter().max().unwrap_or(0))
    }

    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::starting_after(0)
    }
}

/// Applies a pending-to-paid transition, used by both store implementations.
pub(crate) fn settle(record: &mut SalaryRecord) -> bool {
    match record.status.pay() {
        Ok(status) => {
            record.status = status;
            true
        }
        Err(_) => false,
    }
}

pub(crate) fn is_pending_in(record: &SalaryRecord, month: Month) -> bool {
    record.month == month && record.status == SalaryStatus::Pending
}
