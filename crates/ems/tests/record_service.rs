//! Record workflows driven through [`RecordService`] and observed through the reporting views.

use std::sync::Arc;

use chrono::NaiveDate;
use ems::records::{
    EmployeeDraft, FixtureStore, Gender, LeaveDraft, LeaveStatus, Month, RecordChange,
    RecordService, RecordServiceError, SalaryDraft, ValidationError,
};
use ems::reports::{DashboardCounters, ReportDataset, SalaryTotals};

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

fn service() -> RecordService<FixtureStore> {
    RecordService::new(Arc::new(FixtureStore::seeded()))
}

fn new_hire() -> EmployeeDraft {
    EmployeeDraft {
        name: "Neha".to_string(),
        department: "IT".to_string(),
        position: "Analyst".to_string(),
        salary: 58000.0,
        password: "secret1".to_string(),
        gender: Some(Gender::Female),
        age: Some(26),
        salary_month: Some(Month::June),
        join_date: Some(date(6, 2)),
        ..EmployeeDraft::default()
    }
}

async fn counters(service: &RecordService<FixtureStore>) -> DashboardCounters {
    let dataset = ReportDataset::load(service).await;
    DashboardCounters::compute(
        &dataset.employees,
        &dataset.departments,
        &dataset.leaves,
        &dataset.salaries,
    )
}

#[tokio::test]
async fn hiring_leave_and_payroll_flow_updates_dashboard() {
    let service = service();
    let mut changes = service.subscribe();

    let employee = service.add_employee(new_hire()).await.expect("hired");
    assert_eq!(employee.code.as_str(), "EMP006");

    let leave = service
        .submit_leave(LeaveDraft {
            employee_name: "Neha".to_string(),
            department: Some("IT".to_string()),
            from: Some(date(7, 1)),
            to: Some(date(7, 3)),
            reason: "Family event".to_string(),
        })
        .await
        .expect("submitted");
    assert_eq!(leave.days(), 3);
    assert_eq!(counters(&service).await.pending_leaves, 2);

    service
        .decide_leave(leave.id, LeaveStatus::Approved)
        .await
        .expect("approved");

    let salary = service
        .add_salary(SalaryDraft {
            employee_name: "Neha".to_string(),
            department: "IT".to_string(),
            month: Some(Month::June),
            amount: Some(40000.0),
        })
        .await
        .expect("salary added");
    assert_eq!(service.mark_month_paid(Month::June).await.expect("paid"), 1);

    let summary = counters(&service).await;
    assert_eq!(summary.total_employees, 6);
    assert_eq!(summary.pending_leaves, 1);
    assert_eq!(summary.recent_activity[0].describe(), "Neha joined IT department");

    let totals = SalaryTotals::from_records(&service.salaries().await.expect("salaries"));
    assert_eq!(totals.paid, 95000.0);
    assert_eq!(totals.pending, 22000.0);

    let mut seen = Vec::new();
    while let Ok(change) = changes.try_recv() {
        seen.push(change);
    }
    assert_eq!(
        seen,
        [
            RecordChange::EmployeeAdded { id: employee.id },
            RecordChange::LeaveSubmitted { id: leave.id },
            RecordChange::LeaveDecided {
                id: leave.id,
                status: LeaveStatus::Approved,
            },
            RecordChange::SalaryAdded { id: salary.id },
            RecordChange::MonthPaid {
                month: Month::June,
                count: 1,
            },
        ]
    );
}

#[tokio::test]
async fn rejected_drafts_leave_reports_untouched() {
    let service = service();
    let mut changes = service.subscribe();

    let unknown_department = EmployeeDraft {
        department: "Marketing".to_string(),
        ..new_hire()
    };
    let err = service
        .add_employee(unknown_department)
        .await
        .expect_err("unknown department");
    let RecordServiceError::Validation(ValidationError::UnknownDepartment(name)) = &err else {
        panic!("expected unknown department, got {err:?}");
    };
    assert_eq!(name, "Marketing");

    let err = service
        .add_salary(SalaryDraft {
            employee_name: "Neha".to_string(),
            department: "IT".to_string(),
            month: Some(Month::June),
            amount: Some(0.0),
        })
        .await
        .expect_err("zero amount");
    assert!(matches!(
        err,
        RecordServiceError::Validation(ValidationError::NonPositiveAmount)
    ));

    assert_eq!(counters(&service).await.total_employees, 5);
    assert!(changes.try_recv().is_err());
}

#[tokio::test]
async fn paying_a_month_twice_changes_nothing_the_second_time() {
    let service = service();
    assert_eq!(service.mark_month_paid(Month::April).await.expect("paid"), 1);
    assert_eq!(service.mark_month_paid(Month::April).await.expect("paid"), 0);

    let totals = SalaryTotals::from_records(&service.salaries().await.expect("salaries"));
    assert_eq!(totals.pending, 0.0);
}
