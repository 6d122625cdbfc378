//! Derived views for the admin dashboard and the reports page: department comparison,
//! turnover and attendance trends, punctuality, insights and ledger totals.

use chrono::Datelike;
use serde::Serialize;

use crate::attendance::{percentage, round_to};
use crate::records::{
    AttendanceRegister, AttendanceStatus, Department, Employee, EmployeeId, LeaveRequest,
    LeaveStatus, Month, Payslip, SalaryRecord, SalaryStatus,
};

use super::aggregate::{most_leaves, top_performers, DepartmentStats, TOP_N};
use super::record::ReportRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentComparison {
    pub department: String,
    pub employees: usize,
    pub average_salary: f64,
    pub average_performance: f64,
}

/// Averages per department: salary to whole units, performance to two decimals.
pub fn department_comparison(stats: &DepartmentStats) -> Vec<DepartmentComparison> {
    stats
        .iter()
        .map(|(department, stat)| DepartmentComparison {
            department: department.to_string(),
            employees: stat.count,
            average_salary: round_to(stat.average_salary(), 0),
            average_performance: round_to(stat.average_performance(), 2),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnoverPoint {
    pub month: Month,
    pub joiners: usize,
    pub exits: usize,
}

/// Joiners and leavers per month of `year`, January first.
pub fn turnover_series(records: &[ReportRecord], year: i32) -> Vec<TurnoverPoint> {
    let mut points: Vec<TurnoverPoint> = Month::ordered()
        .into_iter()
        .map(|month| TurnoverPoint {
            month,
            joiners: 0,
            exits: 0,
        })
        .collect();

    for record in records {
        if let Some(joined) = record.join_date.filter(|date| date.year() == year) {
            points[Month::of(joined).index()].joiners += 1;
        }
        if let Some(left) = record.exit_date.filter(|date| date.year() == year) {
            points[Month::of(left).index()].exits += 1;
        }
    }
    points
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePoint {
    pub month: Month,
    pub present_pct: f64,
}

/// Share of present marks per month of `year`, 0 for months without marks.
pub fn attendance_series(register: &AttendanceRegister, year: i32) -> Vec<AttendancePoint> {
    let mut tallies = [(0usize, 0usize); 12];
    for (date, _, status) in register.iter().filter(|(date, _, _)| date.year() == year) {
        let (present, total) = &mut tallies[Month::of(date).index()];
        *total += 1;
        if status == AttendanceStatus::Present {
            *present += 1;
        }
    }

    Month::ordered()
        .into_iter()
        .zip(tallies)
        .map(|(month, (present, total))| AttendancePoint {
            month,
            present_pct: percentage(present, total),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PunctualityEntry {
    pub employee: EmployeeId,
    pub name: String,
    pub present_pct: f64,
}

/// Employees with at least one register mark, highest present share first.
pub fn punctuality(employees: &[Employee], register: &AttendanceRegister) -> Vec<PunctualityEntry> {
    let mut ranked: Vec<PunctualityEntry> = employees
        .iter()
        .filter_map(|employee| {
            let marks = register.for_employee(employee.id);
            if marks.is_empty() {
                return None;
            }
            let present = marks
                .iter()
                .filter(|(_, status)| *status == AttendanceStatus::Present)
                .count();
            Some(PunctualityEntry {
                employee: employee.id,
                name: employee.name.clone(),
                present_pct: percentage(present, marks.len()),
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.present_pct.total_cmp(&a.present_pct));
    ranked.truncate(TOP_N);
    ranked
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_punctual: Option<PunctualityEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_average_salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_average_performance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_performer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_leaves: Option<String>,
}

impl Insights {
    pub fn compute(
        records: &[ReportRecord],
        comparison: &[DepartmentComparison],
        punctual: &[PunctualityEntry],
    ) -> Self {
        Self {
            most_punctual: punctual.first().cloned(),
            highest_average_salary: first_max(comparison, |row| row.average_salary),
            best_average_performance: first_max(comparison, |row| row.average_performance),
            top_performer: top_performers(records).first().map(|r| r.name.clone()),
            most_leaves: most_leaves(records).first().map(|r| r.name.clone()),
        }
    }

    /// Display lines, skipping insights without data.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(entry) = &self.most_punctual {
            lines.push(format!(
                "Most punctual: {} ({:.1}%)",
                entry.name, entry.present_pct
            ));
        }
        if let Some(department) = &self.highest_average_salary {
            lines.push(format!("Highest avg salary: {department}"));
        }
        if let Some(department) = &self.best_average_performance {
            lines.push(format!("Best avg performance: {department}"));
        }
        if let Some(name) = &self.top_performer {
            lines.push(format!("Top performer: {name}"));
        }
        if let Some(name) = &self.most_leaves {
            lines.push(format!("Most leaves: {name}"));
        }
        lines
    }
}

fn first_max<F>(rows: &[DepartmentComparison], key: F) -> Option<String>
where
    F: Fn(&DepartmentComparison) -> f64,
{
    let mut best: Option<&DepartmentComparison> = None;
    for row in rows {
        match best {
            Some(current) if key(row) <= key(current) => {}
            _ => best = Some(row),
        }
    }
    best.map(|row| row.department.clone())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Activity {
    EmployeeJoined { name: String, department: String },
    LeaveApplied { name: String },
    SalaryProcessed { employees: usize },
}

impl Activity {
    pub fn describe(&self) -> String {
        match self {
            Activity::EmployeeJoined { name, department } => {
                format!("{name} joined {department} department")
            }
            Activity::LeaveApplied { name } => format!("{name} applied for leave"),
            Activity::SalaryProcessed { employees } => {
                format!("Salary processed for {employees} employees")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounters {
    pub total_employees: usize,
    pub total_departments: usize,
    pub pending_leaves: usize,
    pub salary_paid: f64,
    pub recent_activity: Vec<Activity>,
}

impl DashboardCounters {
    pub fn compute(
        employees: &[Employee],
        departments: &[Department],
        leaves: &[LeaveRequest],
        salaries: &[SalaryRecord],
    ) -> Self {
        let salary_paid = SalaryTotals::from_records(salaries).paid;

        let mut recent_activity = Vec::new();
        if let Some(last) = employees.last() {
            recent_activity.push(Activity::EmployeeJoined {
                name: last.name.clone(),
                department: last.department.clone(),
            });
        }
        if let Some(last) = leaves.last() {
            let name = if last.employee_name.trim().is_empty() {
                "Someone".to_string()
            } else {
                last.employee_name.clone()
            };
            recent_activity.push(Activity::LeaveApplied { name });
        }
        if salary_paid > 0.0 {
            recent_activity.push(Activity::SalaryProcessed {
                employees: employees.len(),
            });
        }

        Self {
            total_employees: employees.len(),
            total_departments: departments.len(),
            pending_leaves: leaves
                .iter()
                .filter(|leave| leave.status == LeaveStatus::Pending)
                .count(),
            salary_paid,
            recent_activity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SalaryTotals {
    pub paid: f64,
    pub pending: f64,
}

impl SalaryTotals {
    pub fn from_records(records: &[SalaryRecord]) -> Self {
        records.iter().fold(Self::default(), |mut totals, record| {
            match record.status {
                SalaryStatus::Paid => totals.paid += record.amount,
                SalaryStatus::Pending => totals.pending += record.amount,
            }
            totals
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipStats {
    pub total_credited: f64,
    pub total_deductions: f64,
    pub highest_net: f64,
    pub lowest_net: f64,
}

impl PayslipStats {
    pub fn from_payslips(payslips: &[Payslip]) -> Self {
        if payslips.is_empty() {
            return Self::default();
        }
        let nets: Vec<f64> = payslips.iter().map(Payslip::net_amount).collect();
        Self {
            total_credited: nets.iter().fold(0.0, |total, net| total + net),
            total_deductions: payslips
                .iter()
                .fold(0.0, |total, slip| total + slip.deductions),
            highest_net: nets.iter().copied().fold(f64::MIN, f64::max),
            lowest_net: nets.iter().copied().fold(f64::MAX, f64::min),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionVisibility {
    pub salary: bool,
    pub department: bool,
    pub performance: bool,
    pub leave: bool,
    pub analytics: bool,
}

impl SectionVisibility {
    pub fn compute(employees: &[ReportRecord], departments: usize) -> Self {
        let any_employees = !employees.is_empty();
        let with_departments = any_employees && departments > 0;
        Self {
            salary: any_employees,
            department: with_departments,
            performance: employees.iter().any(|r| r.scored_performance().is_some()),
            leave: employees.iter().any(|r| r.leaves > 0),
            analytics: with_departments,
        }
    }

    pub fn nothing_to_show(&self) -> bool {
        !(self.salary || self.department || self.performance || self.leave || self.analytics)
    }
}
