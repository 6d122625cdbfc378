use crate::attendance::{AttendanceMark, AttendanceSummary};
use crate::records::{Month, SalaryRecord};
use crate::reports::{
    department_comparison, from_employees, overall_leaves, overall_performance, total_amount,
    DepartmentStats, PayslipStats, ReportDataset, ReportQuery,
};

use super::layout::{Cell, ReportPage, ReportTable, Theme};
use super::ReportSection;

const SALARY_THEME: Theme = Theme {
    header_fill: [167, 139, 250],
    header_text: 255,
    stripe: [243, 232, 255],
};

pub(crate) fn theme(section: ReportSection) -> Theme {
    match section {
        ReportSection::Salary | ReportSection::Analytics => SALARY_THEME,
        ReportSection::Department => Theme {
            header_fill: [59, 130, 246],
            header_text: 255,
            stripe: [219, 234, 254],
        },
        ReportSection::Performance => Theme {
            header_fill: [250, 204, 21],
            header_text: 55,
            stripe: [254, 243, 199],
        },
        ReportSection::Leave => Theme {
            header_fill: [236, 72, 153],
            header_text: 255,
            stripe: [252, 231, 243],
        },
        ReportSection::Attendance => Theme {
            header_fill: [34, 197, 94],
            header_text: 255,
            stripe: [220, 252, 231],
        },
        ReportSection::Payslip => Theme {
            header_fill: [99, 102, 241],
            header_text: 255,
            stripe: [224, 231, 255],
        },
    }
}

/// Builds the page for one section from the current dataset.
pub(crate) fn build_page(
    section: ReportSection,
    dataset: &ReportDataset,
    query: &ReportQuery,
    currency: &str,
) -> ReportPage {
    let (summary, table) = match section {
        ReportSection::Salary => salary(dataset, query, currency),
        ReportSection::Department => department(dataset, query),
        ReportSection::Performance => performance(dataset, query),
        ReportSection::Leave => leave(dataset, query),
        ReportSection::Analytics => analytics(dataset, currency),
        ReportSection::Attendance => attendance(dataset),
        ReportSection::Payslip => payslip(dataset, currency),
    };
    ReportPage {
        title: section.title().to_string(),
        summary,
        table,
        theme: theme(section),
    }
}

fn salary(
    dataset: &ReportDataset,
    query: &ReportQuery,
    currency: &str,
) -> (Vec<String>, ReportTable) {
    let records = dataset.employee_records(query);
    let summary = vec![
        format!("Total Employees: {}", records.len()),
        format!("Total Salary: {currency}{}", total_amount(&records)),
    ];
    let mut table = ReportTable::new(vec!["Name", "Department", "Salary"]);
    for record in &records {
        table.push(vec![
            Cell::text(&record.name),
            Cell::text(record.department_key()),
            Cell::Amount(record.amount_or_zero()),
        ]);
    }
    (summary, table)
}

fn department(dataset: &ReportDataset, query: &ReportQuery) -> (Vec<String>, ReportTable) {
    let records = dataset.employee_records(query);
    let summary = vec![format!("Total Departments: {}", dataset.departments.len())];
    let mut table = ReportTable::new(vec![
        "Department",
        "Employees",
        "Avg Salary",
        "Avg Performance",
    ]);
    for row in department_comparison(&DepartmentStats::from_records(&records)) {
        table.push(vec![
            Cell::Text(row.department),
            Cell::Count(row.employees as u64),
            Cell::Amount(row.average_salary),
            Cell::Fixed(row.average_performance, 2),
        ]);
    }
    (summary, table)
}

fn performance(dataset: &ReportDataset, query: &ReportQuery) -> (Vec<String>, ReportTable) {
    let records = dataset.employee_records(query);
    let summary = vec![format!(
        "Overall Avg. Performance: {:.2}",
        overall_performance(&records)
    )];
    let mut table = ReportTable::new(vec!["Name", "Department", "Performance"]);
    for record in &records {
        table.push(vec![
            Cell::text(&record.name),
            Cell::text(record.department_key()),
            Cell::Number(record.performance.unwrap_or(0.0)),
        ]);
    }
    (summary, table)
}

fn leave(dataset: &ReportDataset, query: &ReportQuery) -> (Vec<String>, ReportTable) {
    let records = dataset.employee_records(query);
    let summary = vec![format!("Total Leaves: {}", overall_leaves(&records))];
    let mut table = ReportTable::new(vec!["Name", "Department", "Leaves"]);
    for record in records.iter().filter(|record| record.leaves > 0) {
        table.push(vec![
            Cell::text(&record.name),
            Cell::text(record.department_key()),
            Cell::Count(u64::from(record.leaves)),
        ]);
    }
    (summary, table)
}

/// Whole-workforce overview; ignores the search query.
fn analytics(dataset: &ReportDataset, currency: &str) -> (Vec<String>, ReportTable) {
    let records = from_employees(&dataset.employees);
    let summary = vec![
        format!("Total Employees: {}", records.len()),
        format!("Departments: {}", dataset.departments.len()),
        format!("Total Salary: {currency}{}", total_amount(&records)),
        format!("Overall Avg. Performance: {:.2}", overall_performance(&records)),
        format!("Total Leaves: {}", overall_leaves(&records)),
    ];
    let mut table = ReportTable::new(vec!["Department", "Employees"]);
    for (department, stat) in DepartmentStats::from_records(&records).iter() {
        table.push(vec![Cell::text(department), Cell::Count(stat.count as u64)]);
    }
    (summary, table)
}

fn attendance(dataset: &ReportDataset) -> (Vec<String>, ReportTable) {
    let mut entries: Vec<_> = dataset.attendance_log.iter().collect();
    entries.sort_by_key(|entry| entry.date);

    let marks: Vec<AttendanceMark> = entries
        .iter()
        .map(|entry| AttendanceMark::from(*entry))
        .collect();
    let stats = AttendanceSummary::from_marks(&marks);
    let summary = vec![
        format!("Present: {} ({:.1}%)", stats.present, stats.present_pct),
        format!("Absent: {} ({:.1}%)", stats.absent, stats.absent_pct),
        format!("Longest Streak: {} days", stats.longest_streak),
    ];

    let mut table = ReportTable::new(vec!["Date", "Status", "Check In", "Check Out", "Note"]);
    for entry in entries {
        table.push(vec![
            Cell::Text(entry.date.to_string()),
            Cell::text(entry.status.label()),
            Cell::text(entry.check_in.as_deref().unwrap_or("-")),
            Cell::text(entry.check_out.as_deref().unwrap_or("-")),
            Cell::text(&entry.note),
        ]);
    }
    (summary, table)
}

fn payslip(dataset: &ReportDataset, currency: &str) -> (Vec<String>, ReportTable) {
    let stats = PayslipStats::from_payslips(&dataset.payslips);
    let summary = vec![
        format!("Total Credited: {currency}{}", stats.total_credited),
        format!("Total Deductions: {currency}{}", stats.total_deductions),
    ];
    let mut table = ReportTable::new(vec![
        "Month",
        "Amount",
        "Deductions",
        "Net Salary",
        "Status",
        "Payslip No.",
        "Date",
        "Remarks",
    ]);
    for slip in &dataset.payslips {
        table.push(vec![
            Cell::text(&slip.month),
            Cell::Amount(slip.amount),
            Cell::Amount(slip.deductions),
            Cell::Amount(slip.net_amount()),
            Cell::text(&slip.status),
            Cell::text(&slip.number),
            Cell::Text(slip.date.to_string()),
            Cell::text(&slip.remarks),
        ]);
    }
    (summary, table)
}

pub(crate) fn receipt_page(record: &SalaryRecord, currency: &str) -> ReportPage {
    let department = record.department.as_deref().unwrap_or("-");
    let status = record.status.label();
    let summary = vec![
        format!("Employee: {}", record.employee_name),
        format!("Department: {department}"),
        format!("Month: {}", record.month),
        format!("Amount: {currency}{}", record.amount),
        format!("Status: {status}"),
    ];
    let mut table = ReportTable::new(vec!["Field", "Value"]);
    table.push(vec![Cell::text("Employee"), Cell::text(&record.employee_name)]);
    table.push(vec![Cell::text("Department"), Cell::text(department)]);
    table.push(vec![Cell::text("Month"), Cell::text(record.month.label())]);
    table.push(vec![Cell::text("Amount"), Cell::Amount(record.amount)]);
    table.push(vec![Cell::text("Status"), Cell::text(status)]);
    ReportPage {
        title: "Salary Receipt".to_string(),
        summary,
        table,
        theme: SALARY_THEME,
    }
}

pub(crate) fn receipts_for_month<'a>(
    records: &'a [SalaryRecord],
    month: Month,
) -> impl Iterator<Item = &'a SalaryRecord> {
    records.iter().filter(move |record| record.month == month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{sample_state, SalaryId, SalaryStatus};

    fn dataset() -> ReportDataset {
        let state = sample_state();
        ReportDataset {
            employees: state.employees,
            departments: state.departments,
            leaves: state.leaves,
            salaries: state.salaries,
            register: state.register,
            attendance_log: state.attendance_log,
            payslips: state.payslips,
        }
    }

    #[test]
    fn salary_page_totals_filtered_rows() {
        let query = ReportQuery {
            q: Some("finance".into()),
            ..ReportQuery::default()
        };
        let page = build_page(ReportSection::Salary, &dataset(), &query, "₹");
        assert_eq!(page.title, "Employee Salary Report");
        assert_eq!(page.summary, ["Total Employees: 1", "Total Salary: ₹45000"]);
        assert_eq!(page.table.columns, ["Name", "Department", "Salary"]);
        assert_eq!(page.theme.header_fill, [167, 139, 250]);
    }

    #[test]
    fn leave_page_lists_only_employees_with_leave() {
        let page = build_page(ReportSection::Leave, &dataset(), &ReportQuery::default(), "₹");
        assert_eq!(page.summary, ["Total Leaves: 8"]);
        assert_eq!(page.table.rows.len(), 4);
    }

    #[test]
    fn department_page_rounds_averages() {
        let page = build_page(
            ReportSection::Department,
            &dataset(),
            &ReportQuery::default(),
            "₹",
        );
        assert_eq!(page.summary, ["Total Departments: 3"]);
        let hr = &page.table.rows[0];
        assert_eq!(hr[0], Cell::text("HR"));
        assert_eq!(hr[1], Cell::Count(2));
        assert_eq!(hr[2], Cell::Amount(51000.0));
        assert!(matches!(hr[3], Cell::Fixed(_, 2)));
    }

    #[test]
    fn analytics_page_has_five_summary_lines() {
        let page = build_page(ReportSection::Analytics, &dataset(), &ReportQuery::default(), "₹");
        assert_eq!(page.summary.len(), 5);
        assert_eq!(page.summary[2], "Total Salary: ₹268000");
        assert_eq!(page.table.columns, ["Department", "Employees"]);
    }

    #[test]
    fn attendance_page_sorts_log_and_fills_missing_times() {
        let mut data = dataset();
        data.attendance_log.reverse();
        let page = build_page(ReportSection::Attendance, &data, &ReportQuery::default(), "₹");
        assert_eq!(page.table.rows[0][0].raw(), "2024-06-01");
        assert_eq!(page.summary[2], "Longest Streak: 2 days");
        assert!(page
            .table
            .rows
            .iter()
            .all(|row| !row[2].raw().is_empty() && !row[3].raw().is_empty()));
    }

    #[test]
    fn empty_dataset_still_builds_zero_summaries() {
        let empty = ReportDataset::default();
        let page = build_page(ReportSection::Salary, &empty, &ReportQuery::default(), "₹");
        assert_eq!(page.summary, ["Total Employees: 0", "Total Salary: ₹0"]);
        assert!(page.table.is_empty());

        let payslips = build_page(ReportSection::Payslip, &empty, &ReportQuery::default(), "₹");
        assert_eq!(payslips.summary[0], "Total Credited: ₹0");
        assert_eq!(payslips.table.columns.len(), 8);
    }

    #[test]
    fn receipt_lists_every_field() {
        let record = SalaryRecord {
            id: SalaryId(7),
            employee_name: "Ravi".into(),
            department: Some("Finance".into()),
            month: Month::April,
            amount: 22000.0,
            status: SalaryStatus::Pending,
        };
        let page = receipt_page(&record, "₹");
        assert_eq!(page.summary[3], "Amount: ₹22000");
        assert_eq!(page.table.rows.len(), 5);
        assert_eq!(page.table.rows[4][1], Cell::text("Pending"));
    }
}
