//! Employee, department, leave, salary, event and attendance records.
//!
//! [`RecordStore`] is the single data-access boundary. [`FixtureStore`] serves seeded
//! in-memory data and [`HttpStore`] talks to a JSON backend; the binary picks one at start-up.
//! [`RecordService`] validates every draft before it reaches the store and announces committed
//! changes on a [`ChangeFeed`].

pub mod domain;
pub mod events;
pub mod fixture;
pub mod http;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

pub use domain::{
    AdminProfile, AttendanceEntry, AttendanceRegister, AttendanceStatus, CalendarEvent,
    Department, DepartmentId, Employee, EmployeeCode, EmployeeId, EventId, EventKind, Gender,
    LeaveId, LeaveRequest, LeaveStatus, Month, Payslip, SalaryId, SalaryRecord, SalaryStatus,
    TransitionError,
};
pub use events::{ChangeFeed, RecordChange};
pub use fixture::{sample_state, FixtureState, FixtureStore};
pub use http::HttpStore;
pub use router::record_router;
pub use service::{RecordService, RecordServiceError};
pub use store::{load_snapshot, IdSequence, RecordSnapshot, RecordStore, StoreError};
pub use validation::{
    DepartmentDirectory, DepartmentDraft, EmployeeDraft, EventDraft, LeaveDraft, NewEvent,
    NewLeave, NewSalary, SalaryDraft, ValidationError,
};
