use serde::Serialize;

use super::aggregate::{DepartmentStats, MonthlySeries};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: &'static str,
    pub total: f64,
    pub leaves: u32,
}

/// Which department figure a pie chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceMeasure {
    Headcount,
    TotalSalary,
}

/// Slices in department insertion order.
pub fn department_slices(stats: &DepartmentStats, measure: SliceMeasure) -> Vec<PieSlice> {
    stats
        .iter()
        .map(|(name, stat)| PieSlice {
            name: name.to_string(),
            value: match measure {
                SliceMeasure::Headcount => stat.count as f64,
                SliceMeasure::TotalSalary => stat.total_salary,
            },
        })
        .collect()
}

/// Points in calendar order, January first.
pub fn monthly_points(series: &MonthlySeries) -> Vec<MonthlyPoint> {
    series
        .iter()
        .map(|entry| MonthlyPoint {
            month: entry.month.label(),
            total: entry.total,
            leaves: entry.leaves,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Month;
    use crate::reports::record::ReportRecord;

    fn record(name: &str, department: &str, amount: f64, month: Month) -> ReportRecord {
        ReportRecord {
            department: Some(department.to_string()),
            amount: Some(amount),
            month: Some(month),
            ..ReportRecord::named(name)
        }
    }

    #[test]
    fn slices_follow_department_insertion_order() {
        let records = vec![
            record("Ravi", "Finance", 45000.0, Month::May),
            record("Amit", "HR", 50000.0, Month::June),
            record("Sonal", "HR", 52000.0, Month::May),
        ];
        let stats = DepartmentStats::from_records(&records);

        let headcount = department_slices(&stats, SliceMeasure::Headcount);
        assert_eq!(
            headcount,
            vec![
                PieSlice { name: "Finance".into(), value: 1.0 },
                PieSlice { name: "HR".into(), value: 2.0 },
            ]
        );

        let salary = department_slices(&stats, SliceMeasure::TotalSalary);
        assert_eq!(salary[1].value, 102000.0);
    }

    #[test]
    fn monthly_points_keep_calendar_order() {
        let records = vec![record("Amit", "HR", 100.0, Month::December)];
        let points = monthly_points(&MonthlySeries::from_records(&records));
        assert_eq!(points.len(), 12);
        assert_eq!(points[0].month, "January");
        assert_eq!(points[11].month, "December");
        assert_eq!(points[11].total, 100.0);
    }
}
