//! Reporting pipeline: records are narrowed by [`filter`], reduced by [`aggregate`],
//! reshaped for charts by [`chart`], and enriched with dashboard [`analytics`].

pub mod aggregate;
pub mod analytics;
pub mod chart;
pub mod filter;
pub mod record;
pub mod router;
pub mod views;

pub use aggregate::{
    most_leaves, overall_leaves, overall_performance, summarize, top_performers, total_amount,
    DepartmentStat, DepartmentStats, MonthlySeries, MonthlyTotal, RankedEntry, ReportSummary,
};
pub use analytics::{
    attendance_series, department_comparison, punctuality, turnover_series, Activity,
    AttendancePoint, DashboardCounters, DepartmentComparison, Insights, PayslipStats,
    PunctualityEntry, SalaryTotals, SectionVisibility, TurnoverPoint,
};
pub use chart::{department_slices, monthly_points, MonthlyPoint, PieSlice, SliceMeasure};
pub use filter::{filter_records, matches, DateRange, SearchField, Searchable};
pub use record::{from_employees, ReportRecord, UNKNOWN_DEPARTMENT};
pub use router::{report_router, ReportState};
pub use views::{build_overview, ReportDataset, ReportQuery, ReportsOverview};
