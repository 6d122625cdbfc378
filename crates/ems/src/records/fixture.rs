use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::domain::{
    AttendanceEntry, AttendanceRegister, AttendanceStatus, CalendarEvent, Department,
    DepartmentId, Employee, EmployeeCode, EmployeeId, EventId, EventKind, Gender, LeaveId,
    LeaveRequest, LeaveStatus, Month, Payslip, SalaryId, SalaryRecord, SalaryStatus,
};
use super::store::{is_pending_in, settle, IdSequence, RecordStore, StoreError};
use super::validation::{DepartmentDraft, EmployeeDraft, NewEvent, NewLeave, NewSalary};

/// In-memory store seeded with the sample workforce.
pub struct FixtureStore {
    state: Mutex<FixtureState>,
    employee_ids: IdSequence,
    department_ids: IdSequence,
    leave_ids: IdSequence,
    salary_ids: IdSequence,
    event_ids: IdSequence,
}

#[derive(Debug, Clone, Default)]
pub struct FixtureState {
    pub employees: Vec<Employee>,
    pub departments: Vec<Department>,
    pub leaves: Vec<LeaveRequest>,
    pub salaries: Vec<SalaryRecord>,
    pub events: Vec<CalendarEvent>,
    pub payslips: Vec<Payslip>,
    pub attendance_log: Vec<AttendanceEntry>,
    pub register: AttendanceRegister,
}

impl FixtureStore {
    pub fn new(state: FixtureState) -> Self {
        Self {
            employee_ids: IdSequence::seeded_from(state.employees.iter().map(|e| e.id.0)),
            department_ids: IdSequence::seeded_from(state.departments.iter().map(|d| d.id.0)),
            leave_ids: IdSequence::seeded_from(state.leaves.iter().map(|l| l.id.0)),
            salary_ids: IdSequence::seeded_from(state.salaries.iter().map(|s| s.id.0)),
            event_ids: IdSequence::seeded_from(state.events.iter().map(|e| e.id.0)),
            state: Mutex::new(state),
        }
    }

    pub fn empty() -> Self {
        Self::new(FixtureState::default())
    }

    pub fn seeded() -> Self {
        Self::new(sample_state())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut FixtureState) -> T) -> T {
        let mut guard = self.state.lock().expect("fixture store mutex poisoned");
        f(&mut guard)
    }
}

impl Default for FixtureStore {
    fn default() -> Self {
        Self::seeded()
    }
}

fn remove_by<T>(items: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> Result<(), StoreError> {
    let before = items.len();
    items.retain(|item| !matches(item));
    if items.len() == before {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FixtureStore {
    async fn employees(&self) -> Result<Vec<Employee>, StoreError> {
        Ok(self.with_state(|state| state.employees.clone()))
    }

    async fn departments(&self) -> Result<Vec<Department>, StoreError> {
        Ok(self.with_state(|state| state.departments.clone()))
    }

    async fn leaves(&self) -> Result<Vec<LeaveRequest>, StoreError> {
        Ok(self.with_state(|state| state.leaves.clone()))
    }

    async fn salaries(&self) -> Result<Vec<SalaryRecord>, StoreError> {
        Ok(self.with_state(|state| state.salaries.clone()))
    }

    async fn events(&self) -> Result<Vec<CalendarEvent>, StoreError> {
        Ok(self.with_state(|state| state.events.clone()))
    }

    async fn payslips(&self) -> Result<Vec<Payslip>, StoreError> {
        Ok(self.with_state(|state| state.payslips.clone()))
    }

    async fn attendance_log(&self) -> Result<Vec<AttendanceEntry>, StoreError> {
        Ok(self.with_state(|state| state.attendance_log.clone()))
    }

    async fn attendance_register(&self) -> Result<AttendanceRegister, StoreError> {
        Ok(self.with_state(|state| state.register.clone()))
    }

    async fn add_employee(
        &self,
        code: EmployeeCode,
        draft: EmployeeDraft,
    ) -> Result<Employee, StoreError> {
        let id = EmployeeId(self.employee_ids.next());
        self.with_state(|state| {
            if state.employees.iter().any(|employee| employee.code == code) {
                return Err(StoreError::Conflict);
            }
            let employee = Employee {
                id,
                code,
                name: draft.name,
                department: draft.department,
                position: draft.position,
                email: draft.email,
                phone: draft.phone,
                address: draft.address,
                salary: draft.salary,
                password: draft.password,
                photo: draft.photo,
                gender: draft.gender,
                age: draft.age,
                performance: draft.performance,
                leaves: 0,
                salary_month: draft.salary_month,
                join_date: draft.join_date,
                exit_date: None,
            };
            state.employees.push(employee.clone());
            Ok(employee)
        })
    }

    async fn update_employee(
        &self,
        id: EmployeeId,
        draft: EmployeeDraft,
    ) -> Result<Employee, StoreError> {
        self.with_state(|state| {
            let employee = state
                .employees
                .iter_mut()
                .find(|employee| employee.id == id)
                .ok_or(StoreError::NotFound)?;
            employee.name = draft.name;
            employee.department = draft.department;
            employee.position = draft.position;
            employee.email = draft.email;
            employee.phone = draft.phone;
            employee.address = draft.address;
            employee.salary = draft.salary;
            employee.password = draft.password;
            employee.photo = draft.photo;
            employee.gender = draft.gender;
            employee.age = draft.age;
            if draft.performance.is_some() {
                employee.performance = draft.performance;
            }
            if draft.salary_month.is_some() {
                employee.salary_month = draft.salary_month;
            }
            if draft.join_date.is_some() {
                employee.join_date = draft.join_date;
            }
            Ok(employee.clone())
        })
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<(), StoreError> {
        self.with_state(|state| {
            remove_by(&mut state.employees, |employee| employee.id == id)?;
            state.register.forget_employee(id);
            Ok(())
        })
    }

    async fn add_department(&self, draft: DepartmentDraft) -> Result<Department, StoreError> {
        let id = DepartmentId(self.department_ids.next());
        self.with_state(|state| {
            let department = Department {
                id,
                name: draft.name.trim().to_string(),
                description: draft.description.trim().to_string(),
            };
            state.departments.push(department.clone());
            Ok(department)
        })
    }

    async fn update_department(
        &self,
        id: DepartmentId,
        draft: DepartmentDraft,
    ) -> Result<Department, StoreError> {
        self.with_state(|state| {
            let department = state
                .departments
                .iter_mut()
                .find(|department| department.id == id)
                .ok_or(StoreError::NotFound)?;
            department.name = draft.name.trim().to_string();
            department.description = draft.description.trim().to_string();
            Ok(department.clone())
        })
    }

    async fn delete_department(&self, id: DepartmentId) -> Result<(), StoreError> {
        self.with_state(|state| remove_by(&mut state.departments, |department| department.id == id))
    }

    async fn submit_leave(&self, leave: NewLeave) -> Result<LeaveRequest, StoreError> {
        let id = LeaveId(self.leave_ids.next());
        self.with_state(|state| {
            let request = LeaveRequest {
                id,
                employee_name: leave.employee_name,
                department: leave.department,
                from: leave.from,
                to: leave.to,
                reason: leave.reason,
                status: LeaveStatus::Pending,
            };
            state.leaves.push(request.clone());
            Ok(request)
        })
    }

    async fn decide_leave(
        &self,
        id: LeaveId,
        status: LeaveStatus,
    ) -> Result<LeaveRequest, StoreError> {
        self.with_state(|state| {
            let request = state
                .leaves
                .iter_mut()
                .find(|request| request.id == id)
                .ok_or(StoreError::NotFound)?;
            request.status = status;
            Ok(request.clone())
        })
    }

    async fn delete_leave(&self, id: LeaveId) -> Result<(), StoreError> {
        self.with_state(|state| remove_by(&mut state.leaves, |request| request.id == id))
    }

    async fn add_salary(&self, salary: NewSalary) -> Result<SalaryRecord, StoreError> {
        let id = SalaryId(self.salary_ids.next());
        self.with_state(|state| {
            let record = SalaryRecord {
                id,
                employee_name: salary.employee_name,
                department: Some(salary.department),
                month: salary.month,
                amount: salary.amount,
                status: SalaryStatus::Pending,
            };
            state.salaries.push(record.clone());
            Ok(record)
        })
    }

    async fn mark_salary_paid(&self, id: SalaryId) -> Result<SalaryRecord, StoreError> {
        self.with_state(|state| {
            let record = state
                .salaries
                .iter_mut()
                .find(|record| record.id == id)
                .ok_or(StoreError::NotFound)?;
            settle(record);
            Ok(record.clone())
        })
    }

    async fn mark_month_paid(&self, month: Month) -> Result<usize, StoreError> {
        self.with_state(|state| {
            Ok(state
                .salaries
                .iter_mut()
                .filter(|record| is_pending_in(record, month))
                .map(settle)
                .filter(|changed| *changed)
                .count())
        })
    }

    async fn delete_salary(&self, id: SalaryId) -> Result<(), StoreError> {
        self.with_state(|state| remove_by(&mut state.salaries, |record| record.id == id))
    }

    async fn add_event(&self, event: NewEvent) -> Result<CalendarEvent, StoreError> {
        let id = EventId(self.event_ids.next());
        self.with_state(|state| {
            let event = CalendarEvent {
                id,
                kind: event.kind,
                title: event.title,
                date: event.date,
                details: event.details,
            };
            state.events.push(event.clone());
            Ok(event)
        })
    }

    async fn delete_event(&self, id: EventId) -> Result<(), StoreError> {
        self.with_state(|state| remove_by(&mut state.events, |event| event.id == id))
    }

    async fn mark_attendance(
        &self,
        date: NaiveDate,
        employee: EmployeeId,
        status: AttendanceStatus,
    ) -> Result<(), StoreError> {
        self.with_state(|state| {
            if !state.employees.iter().any(|candidate| candidate.id == employee) {
                return Err(StoreError::NotFound);
            }
            state.register.mark(date, employee, status);
            Ok(())
        })
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

struct Seed {
    name: &'static str,
    department: &'static str,
    position: &'static str,
    city: &'static str,
    salary: f64,
    gender: Gender,
    age: u8,
    performance: f64,
    leaves: u32,
    month: Month,
    joined: NaiveDate,
    exited: Option<NaiveDate>,
}

fn seed_employee(index: usize, seed: Seed) -> Employee {
    let number = index as u64 + 1;
    Employee {
        id: EmployeeId(number),
        code: EmployeeCode(format!("EMP{number:03}")),
        name: seed.name.to_string(),
        department: seed.department.to_string(),
        position: seed.position.to_string(),
        email: format!("{}@demo.com", seed.name.to_lowercase()),
        phone: format!("98765432{:02}", 10 + index),
        address: seed.city.to_string(),
        salary: seed.salary,
        password: "123456".to_string(),
        photo: None,
        gender: Some(seed.gender),
        age: Some(seed.age),
        performance: Some(seed.performance),
        leaves: seed.leaves,
        salary_month: Some(seed.month),
        join_date: Some(seed.joined),
        exit_date: seed.exited,
    }
}

/// Sample data shown when no backend is configured.
pub fn sample_state() -> FixtureState {
    let employees = vec![
        Seed {
            name: "Amit",
            department: "HR",
            position: "Manager",
            city: "Delhi",
            salary: 50000.0,
            gender: Gender::Male,
            age: 32,
            performance: 4.5,
            leaves: 2,
            month: Month::June,
            joined: date(2024, 1, 10),
            exited: None,
        },
        Seed {
            name: "Priya",
            department: "IT",
            position: "Developer",
            city: "Mumbai",
            salary: 60000.0,
            gender: Gender::Female,
            age: 28,
            performance: 4.2,
            leaves: 1,
            month: Month::June,
            joined: date(2024, 3, 15),
            exited: None,
        },
        Seed {
            name: "Ravi",
            department: "Finance",
            position: "Accountant",
            city: "Pune",
            salary: 45000.0,
            gender: Gender::Male,
            age: 35,
            performance: 3.9,
            leaves: 3,
            month: Month::May,
            joined: date(2023, 12, 1),
            exited: None,
        },
        Seed {
            name: "Sonal",
            department: "HR",
            position: "Recruiter",
            city: "Jaipur",
            salary: 52000.0,
            gender: Gender::Female,
            age: 30,
            performance: 4.8,
            leaves: 0,
            month: Month::May,
            joined: date(2024, 2, 1),
            exited: None,
        },
        Seed {
            name: "Deepak",
            department: "IT",
            position: "QA Engineer",
            city: "Bengaluru",
            salary: 61000.0,
            gender: Gender::Male,
            age: 34,
            performance: 4.1,
            leaves: 2,
            month: Month::April,
            joined: date(2024, 1, 20),
            exited: Some(date(2024, 6, 1)),
        },
    ]
    .into_iter()
    .enumerate()
    .map(|(index, seed)| seed_employee(index, seed))
    .collect::<Vec<_>>();

    let departments = [
        ("HR", "People operations and hiring"),
        ("IT", "Engineering and internal systems"),
        ("Finance", "Payroll, accounts and audit"),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (name, description))| Department {
        id: DepartmentId(index as u64 + 1),
        name: name.to_string(),
        description: description.to_string(),
    })
    .collect();

    let leaves = vec![
        LeaveRequest {
            id: LeaveId(1),
            employee_name: "Amit".to_string(),
            department: Some("HR".to_string()),
            from: date(2025, 6, 10),
            to: date(2025, 6, 12),
            reason: "Personal".to_string(),
            status: LeaveStatus::Pending,
        },
        LeaveRequest {
            id: LeaveId(2),
            employee_name: "Priya".to_string(),
            department: Some("IT".to_string()),
            from: date(2025, 6, 8),
            to: date(2025, 6, 9),
            reason: "Medical".to_string(),
            status: LeaveStatus::Approved,
        },
    ];

    let salaries = [
        ("Amit", "HR", Month::June, 25000.0, SalaryStatus::Paid),
        ("Priya", "IT", Month::May, 30000.0, SalaryStatus::Paid),
        ("Ravi", "Finance", Month::April, 22000.0, SalaryStatus::Pending),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (name, department, month, amount, status))| SalaryRecord {
        id: SalaryId(index as u64 + 1),
        employee_name: name.to_string(),
        department: Some(department.to_string()),
        month,
        amount,
        status,
    })
    .collect();

    let events = vec![
        CalendarEvent {
            id: EventId(1),
            kind: EventKind::Holiday,
            title: "Independence Day".to_string(),
            date: date(2025, 8, 15),
            details: "National Holiday".to_string(),
        },
        CalendarEvent {
            id: EventId(2),
            kind: EventKind::Function,
            title: "Annual Day".to_string(),
            date: date(2025, 12, 20),
            details: "Cultural Program".to_string(),
        },
    ];

    let payslips = [
        ("June 2025", "#12345", date(2025, 6, 30), "Performance Bonus Included"),
        ("May 2025", "#12344", date(2025, 5, 31), ""),
        ("April 2025", "#12343", date(2025, 4, 30), "Leave encashment"),
    ]
    .into_iter()
    .map(|(month, number, credited, remarks)| Payslip {
        month: month.to_string(),
        amount: 50000.0,
        deductions: 2000.0,
        net: Some(48000.0),
        status: "Credited".to_string(),
        number: number.to_string(),
        date: credited,
        remarks: remarks.to_string(),
    })
    .collect();

    let attendance_log = [
        (1, AttendanceStatus::Present, "09:10", "18:00", "On time"),
        (2, AttendanceStatus::Absent, "", "", "Sick leave"),
        (3, AttendanceStatus::Present, "09:05", "18:10", ""),
        (4, AttendanceStatus::Present, "09:00", "18:00", "Perfect"),
        (5, AttendanceStatus::Absent, "", "", "Personal"),
    ]
    .into_iter()
    .map(|(day, status, check_in, check_out, note)| AttendanceEntry {
        date: date(2024, 6, day),
        status,
        check_in: Some(check_in.to_string()).filter(|value| !value.is_empty()),
        check_out: Some(check_out.to_string()).filter(|value| !value.is_empty()),
        note: note.to_string(),
    })
    .collect();

    let mut register = AttendanceRegister::default();
    for day in 3..=7 {
        let marked = date(2024, 6, day);
        for employee in &employees {
            let absent = (employee.id.0 + u64::from(day)) % 4 == 0;
            let status = if absent {
                AttendanceStatus::Absent
            } else {
                AttendanceStatus::Present
            };
            register.mark(marked, employee.id, status);
        }
    }

    FixtureState {
        employees,
        departments,
        leaves,
        salaries,
        events,
        payslips,
        attendance_log,
        register,
    }
}
