use chrono::NaiveDate;
use serde::Serialize;

use crate::records::{
    Employee, EmployeeId, LeaveRequest, LeaveStatus, Month, SalaryRecord, SalaryStatus,
};

/// Department bucket for records that do not name one.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

/// Uniform view over employees, salary entries and leave requests, which is what the
/// aggregator, the filter and the exporters consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<EmployeeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    pub department: Option<String>,
    pub position: String,
    pub amount: Option<f64>,
    pub performance: Option<f64>,
    pub leaves: u32,
    pub month: Option<Month>,
    /// Pending salary or leave entries are excluded from leave totals in the monthly series.
    pub pending: bool,
    pub join_date: Option<NaiveDate>,
    pub exit_date: Option<NaiveDate>,
}

impl ReportRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            employee: None,
            code: None,
            name: name.into(),
            department: None,
            position: String::new(),
            amount: None,
            performance: None,
            leaves: 0,
            month: None,
            pending: false,
            join_date: None,
            exit_date: None,
        }
    }

    /// Department name, or [`UNKNOWN_DEPARTMENT`] when missing or blank.
    pub fn department_key(&self) -> &str {
        self.department
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_DEPARTMENT)
    }

    pub fn amount_or_zero(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }

    /// A score counts only when present and non-zero.
    pub fn scored_performance(&self) -> Option<f64> {
        self.performance.filter(|score| *score != 0.0 && !score.is_nan())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl From<&Employee> for ReportRecord {
    fn from(employee: &Employee) -> Self {
        Self {
            employee: Some(employee.id),
            code: Some(employee.code.to_string()),
            name: employee.name.clone(),
            department: non_blank(&employee.department),
            position: employee.position.clone(),
            amount: Some(employee.salary),
            performance: employee.performance,
            leaves: employee.leaves,
            month: employee.salary_month,
            pending: false,
            join_date: employee.join_date,
            exit_date: employee.exit_date,
        }
    }
}

impl From<&SalaryRecord> for ReportRecord {
    fn from(record: &SalaryRecord) -> Self {
        Self {
            department: record.department.as_deref().and_then(non_blank),
            amount: Some(record.amount),
            month: Some(record.month),
            pending: record.status == SalaryStatus::Pending,
            ..Self::named(record.employee_name.clone())
        }
    }
}

impl From<&LeaveRequest> for ReportRecord {
    fn from(request: &LeaveRequest) -> Self {
        Self {
            department: request.department.as_deref().and_then(non_blank),
            leaves: request.days(),
            month: Some(Month::of(request.from)),
            pending: request.status == LeaveStatus::Pending,
            ..Self::named(request.employee_name.clone())
        }
    }
}

pub fn from_employees(employees: &[Employee]) -> Vec<ReportRecord> {
    employees.iter().map(ReportRecord::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::LeaveId;

    #[test]
    fn blank_departments_fall_into_unknown_bucket() {
        let mut record = ReportRecord::named("Asha");
        assert_eq!(record.department_key(), UNKNOWN_DEPARTMENT);
        record.department = Some("  ".to_string());
        assert_eq!(record.department_key(), UNKNOWN_DEPARTMENT);
        record.department = Some("IT".to_string());
        assert_eq!(record.department_key(), "IT");
    }

    #[test]
    fn leave_requests_report_their_length_and_month() {
        let request = LeaveRequest {
            id: LeaveId(1),
            employee_name: "Amit".to_string(),
            department: Some("HR".to_string()),
            from: NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid"),
            to: NaiveDate::from_ymd_opt(2025, 6, 12).expect("valid"),
            reason: "Personal".to_string(),
            status: LeaveStatus::Pending,
        };
        let record = ReportRecord::from(&request);
        assert_eq!(record.leaves, 3);
        assert_eq!(record.month, Some(Month::June));
        assert!(record.pending);
        assert_eq!(record.amount, None);
    }

    #[test]
    fn zero_scores_do_not_count() {
        let mut record = ReportRecord::named("Ravi");
        record.performance = Some(0.0);
        assert_eq!(record.scored_performance(), None);
        record.performance = Some(3.9);
        assert_eq!(record.scored_performance(), Some(3.9));
    }
}
