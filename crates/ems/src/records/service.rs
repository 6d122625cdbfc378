use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use tokio::sync::broadcast;
use tracing::info;

use crate::attendance::{AttendanceMark, AttendanceSummary};

use super::domain::{
    AdminProfile, AttendanceEntry, AttendanceRegister, AttendanceStatus, CalendarEvent,
    Department, DepartmentId, Employee, EmployeeCode, EmployeeId, EventId, LeaveId,
    LeaveRequest, LeaveStatus, Month, Payslip, SalaryId, SalaryRecord, TransitionError,
};
use super::events::{ChangeFeed, RecordChange};
use super::store::{load_snapshot, RecordSnapshot, RecordStore, StoreError};
use super::validation::{
    DepartmentDirectory, DepartmentDraft, EmployeeDraft, EventDraft, LeaveDraft, SalaryDraft,
    ValidationError,
};

/// Validates drafts, applies them to the store and announces each committed change.
pub struct RecordService<S: ?Sized> {
    store: Arc<S>,
    feed: ChangeFeed,
    profile: RwLock<AdminProfile>,
}

impl<S> RecordService<S>
where
    S: RecordStore + ?Sized + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_feed(store, ChangeFeed::default())
    }

    pub fn with_feed(store: Arc<S>, feed: ChangeFeed) -> Self {
        Self {
            store,
            feed,
            profile: RwLock::new(AdminProfile {
                display_name: "Admin".to_string(),
                photo: None,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordChange> {
        self.feed.subscribe()
    }

    pub async fn snapshot(&self) -> RecordSnapshot {
        load_snapshot(self.store.as_ref()).await
    }

    pub async fn employees(&self) -> Result<Vec<Employee>, RecordServiceError> {
        Ok(self.store.employees().await?)
    }

    pub async fn departments(&self) -> Result<Vec<Department>, RecordServiceError> {
        Ok(self.store.departments().await?)
    }

    pub async fn leaves(&self) -> Result<Vec<LeaveRequest>, RecordServiceError> {
        Ok(self.store.leaves().await?)
    }

    pub async fn salaries(&self) -> Result<Vec<SalaryRecord>, RecordServiceError> {
        Ok(self.store.salaries().await?)
    }

    pub async fn events(&self) -> Result<Vec<CalendarEvent>, RecordServiceError> {
        Ok(self.store.events().await?)
    }

    pub async fn payslips(&self) -> Result<Vec<Payslip>, RecordServiceError> {
        Ok(self.store.payslips().await?)
    }

    pub async fn attendance_log(&self) -> Result<Vec<AttendanceEntry>, RecordServiceError> {
        Ok(self.store.attendance_log().await?)
    }

    pub async fn attendance_register(&self) -> Result<AttendanceRegister, RecordServiceError> {
        Ok(self.store.attendance_register().await?)
    }

    pub async fn add_employee(&self, draft: EmployeeDraft) -> Result<Employee, RecordServiceError> {
        let directory = DepartmentDirectory::new(&self.store.departments().await?);
        draft.validate(&directory)?;

        let existing = self.store.employees().await?;
        let code = EmployeeCode::next_after(existing.iter().map(|employee| &employee.code));
        let employee = self.store.add_employee(code, draft).await?;

        info!(id = %employee.id, code = %employee.code, "employee added");
        self.feed
            .publish(RecordChange::EmployeeAdded { id: employee.id });
        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        id: EmployeeId,
        draft: EmployeeDraft,
    ) -> Result<Employee, RecordServiceError> {
        let directory = DepartmentDirectory::new(&self.store.departments().await?);
        draft.validate_update(&directory)?;

        let employee = self.store.update_employee(id, draft).await?;
        info!(%id, "employee updated");
        self.feed.publish(RecordChange::EmployeeUpdated { id });
        Ok(employee)
    }

    pub async fn delete_employee(&self, id: EmployeeId) -> Result<(), RecordServiceError> {
        self.store.delete_employee(id).await?;
        info!(%id, "employee removed");
        self.feed.publish(RecordChange::EmployeeRemoved { id });
        Ok(())
    }

    pub async fn add_department(
        &self,
        draft: DepartmentDraft,
    ) -> Result<Department, RecordServiceError> {
        draft.validate(&self.store.departments().await?, None)?;
        let department = self.store.add_department(draft).await?;
        info!(id = %department.id, name = %department.name, "department added");
        self.feed
            .publish(RecordChange::DepartmentAdded { id: department.id });
        Ok(department)
    }

    /// Renaming does not cascade to employees, leaves or salaries that name the department.
    pub async fn update_department(
        &self,
        id: DepartmentId,
        draft: DepartmentDraft,
    ) -> Result<Department, RecordServiceError> {
        draft.validate(&self.store.departments().await?, Some(id))?;
        let department = self.store.update_department(id, draft).await?;
        info!(%id, name = %department.name, "department updated");
        self.feed.publish(RecordChange::DepartmentUpdated { id });
        Ok(department)
    }

    pub async fn delete_department(&self, id: DepartmentId) -> Result<(), RecordServiceError> {
        self.store.delete_department(id).await?;
        info!(%id, "department removed");
        self.feed.publish(RecordChange::DepartmentRemoved { id });
        Ok(())
    }

    pub async fn submit_leave(
        &self,
        draft: LeaveDraft,
    ) -> Result<LeaveRequest, RecordServiceError> {
        let leave = draft.validate()?;
        let request = self.store.submit_leave(leave).await?;
        info!(
            id = %request.id,
            employee = %request.employee_name,
            days = request.days(),
            "leave submitted"
        );
        self.feed
            .publish(RecordChange::LeaveSubmitted { id: request.id });
        Ok(request)
    }

    pub async fn decide_leave(
        &self,
        id: LeaveId,
        decision: LeaveStatus,
    ) -> Result<LeaveRequest, RecordServiceError> {
        let current = self
            .store
            .leaves()
            .await?
            .into_iter()
            .find(|request| request.id == id)
            .ok_or(StoreError::NotFound)?;
        let status = current.status.decide(decision)?;

        let request = self.store.decide_leave(id, status).await?;
        info!(%id, status = status.label(), "leave decided");
        self.feed.publish(RecordChange::LeaveDecided { id, status });
        Ok(request)
    }

    pub async fn delete_leave(&self, id: LeaveId) -> Result<(), RecordServiceError> {
        self.store.delete_leave(id).await?;
        info!(%id, "leave removed");
        self.feed.publish(RecordChange::LeaveRemoved { id });
        Ok(())
    }

    pub async fn add_salary(&self, draft: SalaryDraft) -> Result<SalaryRecord, RecordServiceError> {
        let salary = draft.validate()?;
        let record = self.store.add_salary(salary).await?;
        info!(id = %record.id, month = %record.month, amount = record.amount, "salary added");
        self.feed.publish(RecordChange::SalaryAdded { id: record.id });
        Ok(record)
    }

    pub async fn mark_salary_paid(&self, id: SalaryId) -> Result<SalaryRecord, RecordServiceError> {
        let current = self
            .store
            .salaries()
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(StoreError::NotFound)?;
        current.status.pay()?;

        let record = self.store.mark_salary_paid(id).await?;
        info!(%id, "salary marked paid");
        self.feed.publish(RecordChange::SalaryPaid { id });
        Ok(record)
    }

    /// Pays every pending salary of `month`. Returns how many records changed.
    pub async fn mark_month_paid(&self, month: Month) -> Result<usize, RecordServiceError> {
        let count = self.store.mark_month_paid(month).await?;
        info!(%month, count, "month marked paid");
        if count > 0 {
            self.feed.publish(RecordChange::MonthPaid { month, count });
        }
        Ok(count)
    }

    pub async fn delete_salary(&self, id: SalaryId) -> Result<(), RecordServiceError> {
        self.store.delete_salary(id).await?;
        info!(%id, "salary removed");
        self.feed.publish(RecordChange::SalaryRemoved { id });
        Ok(())
    }

    pub async fn add_event(&self, draft: EventDraft) -> Result<CalendarEvent, RecordServiceError> {
        let event = self.store.add_event(draft.validate()?).await?;
        info!(id = %event.id, title = %event.title, "event added");
        self.feed.publish(RecordChange::EventAdded { id: event.id });
        Ok(event)
    }

    pub async fn delete_event(&self, id: EventId) -> Result<(), RecordServiceError> {
        self.store.delete_event(id).await?;
        info!(%id, "event removed");
        self.feed.publish(RecordChange::EventRemoved { id });
        Ok(())
    }

    pub async fn mark_attendance(
        &self,
        date: NaiveDate,
        employee: EmployeeId,
        status: AttendanceStatus,
    ) -> Result<(), RecordServiceError> {
        self.store.mark_attendance(date, employee, status).await?;
        self.feed.publish(RecordChange::AttendanceMarked {
            date,
            employee,
            status,
        });
        Ok(())
    }

    /// Attendance statistics for one employee from the admin register, or for the
    /// self-service log when no employee is given. Marks are put in date order first.
    pub async fn attendance_summary(
        &self,
        employee: Option<EmployeeId>,
    ) -> Result<AttendanceSummary, RecordServiceError> {
        let mut marks: Vec<AttendanceMark> = match employee {
            Some(id) => self
                .store
                .attendance_register()
                .await?
                .for_employee(id)
                .into_iter()
                .map(AttendanceMark::from)
                .collect(),
            None => self
                .store
                .attendance_log()
                .await?
                .iter()
                .map(AttendanceMark::from)
                .collect(),
        };
        marks.sort_by_key(|mark| mark.date);
        Ok(AttendanceSummary::from_marks(&marks))
    }

    pub fn profile(&self) -> AdminProfile {
        self.profile.read().expect("profile lock poisoned").clone()
    }

    pub fn update_profile(&self, profile: AdminProfile) -> AdminProfile {
        {
            let mut guard = self.profile.write().expect("profile lock poisoned");
            *guard = profile.clone();
        }
        self.feed.publish(RecordChange::ProfileChanged {
            profile: profile.clone(),
        });
        profile
    }
}

/// Error raised by the record service.
#[derive(Debug, thiserror::Error)]
pub enum RecordServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
