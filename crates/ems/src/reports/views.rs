use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::records::{
    AttendanceEntry, AttendanceRegister, Department, Employee, LeaveRequest, Payslip,
    RecordService, RecordServiceError, RecordStore, SalaryRecord,
};

use super::aggregate::{summarize, ReportSummary};
use super::analytics::{
    attendance_series, department_comparison, punctuality, turnover_series, AttendancePoint,
    DashboardCounters, DepartmentComparison, Insights, PayslipStats, PunctualityEntry,
    SalaryTotals, SectionVisibility, TurnoverPoint,
};
use super::chart::{department_slices, monthly_points, MonthlyPoint, PieSlice, SliceMeasure};
use super::filter::{filter_records, DateRange, SearchField};
use super::record::{from_employees, ReportRecord};

/// Everything the reports page and the exporters read, loaded in one go.
#[derive(Debug, Clone, Default)]
pub struct ReportDataset {
    pub employees: Vec<Employee>,
    pub departments: Vec<Department>,
    pub leaves: Vec<LeaveRequest>,
    pub salaries: Vec<SalaryRecord>,
    pub register: AttendanceRegister,
    pub attendance_log: Vec<AttendanceEntry>,
    pub payslips: Vec<Payslip>,
}

impl ReportDataset {
    /// The four core collections share one all-or-nothing fetch. Attendance and payslips
    /// degrade to empty on their own.
    pub async fn load<S>(service: &RecordService<S>) -> Self
    where
        S: RecordStore + ?Sized + 'static,
    {
        let snapshot = service.snapshot().await;
        let (register, attendance_log, payslips) = tokio::join!(
            service.attendance_register(),
            service.attendance_log(),
            service.payslips(),
        );

        Self {
            employees: snapshot.employees,
            departments: snapshot.departments,
            leaves: snapshot.leaves,
            salaries: snapshot.salaries,
            register: or_empty("attendance register", register),
            attendance_log: or_empty("attendance log", attendance_log),
            payslips: or_empty("payslips", payslips),
        }
    }

    /// Employees narrowed by name/department search and the join/exit window.
    pub fn employee_records(&self, query: &ReportQuery) -> Vec<ReportRecord> {
        let records = from_employees(&self.employees);
        let searched = match query.search() {
            Some(needle) => filter_records(&records, needle, SearchField::REPORT),
            None => records,
        };
        query.range().apply(searched)
    }

    /// Latest year with attendance marks or join dates, else the current year.
    pub fn reference_year(&self) -> i32 {
        let marked = self.register.iter().map(|(date, _, _)| date.year());
        let joined = self
            .employees
            .iter()
            .filter_map(|employee| employee.join_date.map(|date| date.year()));
        marked
            .chain(joined)
            .max()
            .unwrap_or_else(|| Utc::now().year())
    }
}

fn or_empty<T: Default>(what: &str, result: Result<T, RecordServiceError>) -> T {
    result.unwrap_or_else(|err| {
        warn!(collection = what, error = %err, "falling back to empty collection");
        T::default()
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl ReportQuery {
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub headcount: Vec<PieSlice>,
    pub salary_share: Vec<PieSlice>,
    pub monthly: Vec<MonthlyPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub year: i32,
    pub comparison: Vec<DepartmentComparison>,
    pub turnover: Vec<TurnoverPoint>,
    pub attendance: Vec<AttendancePoint>,
    pub punctual: Vec<PunctualityEntry>,
    pub insights: Vec<String>,
}

/// Payload of the reports page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsOverview {
    pub employees: Vec<ReportRecord>,
    pub summary: ReportSummary,
    pub charts: ChartSeries,
    pub analytics: Analytics,
    pub counters: DashboardCounters,
    pub salary_totals: SalaryTotals,
    pub payslips: PayslipStats,
    pub sections: SectionVisibility,
}

pub fn build_overview(dataset: &ReportDataset, query: &ReportQuery) -> ReportsOverview {
    let employees = dataset.employee_records(query);
    let summary = summarize(&employees);
    let year = query.year.unwrap_or_else(|| dataset.reference_year());

    let comparison = department_comparison(&summary.department_stats);
    let punctual = punctuality(&dataset.employees, &dataset.register);
    let insights = Insights::compute(&employees, &comparison, &punctual).lines();

    ReportsOverview {
        charts: ChartSeries {
            headcount: department_slices(&summary.department_stats, SliceMeasure::Headcount),
            salary_share: department_slices(&summary.department_stats, SliceMeasure::TotalSalary),
            monthly: monthly_points(&summary.monthly_series),
        },
        analytics: Analytics {
            year,
            comparison,
            turnover: turnover_series(&employees, year),
            attendance: attendance_series(&dataset.register, year),
            punctual,
            insights,
        },
        counters: DashboardCounters::compute(
            &dataset.employees,
            &dataset.departments,
            &dataset.leaves,
            &dataset.salaries,
        ),
        salary_totals: SalaryTotals::from_records(&dataset.salaries),
        payslips: PayslipStats::from_payslips(&dataset.payslips),
        sections: SectionVisibility::compute(&employees, dataset.departments.len()),
        summary,
        employees,
    }
}
