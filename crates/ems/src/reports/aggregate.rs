use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::records::Month;

use super::record::ReportRecord;

pub const TOP_N: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentStat {
    pub count: usize,
    pub total_salary: f64,
    pub total_performance: f64,
}

impl DepartmentStat {
    pub fn average_salary(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_salary / self.count as f64
        }
    }

    pub fn average_performance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_performance / self.count as f64
        }
    }
}

/// Per-department totals in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepartmentStats {
    entries: Vec<(String, DepartmentStat)>,
}

impl DepartmentStats {
    /// Single pass over `records`. Every record lands in exactly one bucket.
    pub fn from_records(records: &[ReportRecord]) -> Self {
        let mut stats = Self::default();
        for record in records {
            let stat = stats.bucket(record.department_key());
            stat.count += 1;
            stat.total_salary += record.amount_or_zero();
            stat.total_performance += record.performance.unwrap_or(0.0);
        }
        stats
    }

    fn bucket(&mut self, department: &str) -> &mut DepartmentStat {
        let index = match self.entries.iter().position(|(name, _)| name == department) {
            Some(index) => index,
            None => {
                self.entries
                    .push((department.to_string(), DepartmentStat::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn get(&self, department: &str) -> Option<&DepartmentStat> {
        self.entries
            .iter()
            .find(|(name, _)| name == department)
            .map(|(_, stat)| stat)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DepartmentStat)> {
        self.entries.iter().map(|(name, stat)| (name.as_str(), stat))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|(_, stat)| stat.count).sum()
    }
}

impl Serialize for DepartmentStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, stat) in &self.entries {
            map.serialize_entry(name, stat)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: Month,
    pub total: f64,
    pub leaves: u32,
}

/// One entry per calendar month, January first, whether or not the month has data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthlySeries {
    entries: Vec<MonthlyTotal>,
}

impl MonthlySeries {
    pub fn from_records(records: &[ReportRecord]) -> Self {
        let mut entries: Vec<MonthlyTotal> = Month::ordered()
            .into_iter()
            .map(|month| MonthlyTotal {
                month,
                total: 0.0,
                leaves: 0,
            })
            .collect();

        for record in records {
            let Some(month) = record.month else {
                continue;
            };
            let entry = &mut entries[month.index()];
            entry.total += record.amount_or_zero();
            if !record.pending {
                entry.leaves += record.leaves;
            }
        }

        Self { entries }
    }

    pub fn get(&self, month: Month) -> &MonthlyTotal {
        &self.entries[month.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthlyTotal> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mean of the present, non-zero scores. 0 when there are none.
pub fn overall_performance(records: &[ReportRecord]) -> f64 {
    let (sum, count) = records
        .iter()
        .filter_map(ReportRecord::scored_performance)
        .fold((0.0, 0usize), |(sum, count), score| (sum + score, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn overall_leaves(records: &[ReportRecord]) -> u32 {
    records.iter().map(|record| record.leaves).sum()
}

/// Starts from +0.0 so an empty total prints as "0".
pub fn total_amount(records: &[ReportRecord]) -> f64 {
    records
        .iter()
        .map(ReportRecord::amount_or_zero)
        .fold(0.0, |total, amount| total + amount)
}

/// Scored records, best first. Ties keep input order.
pub fn top_performers(records: &[ReportRecord]) -> Vec<&ReportRecord> {
    let mut ranked: Vec<(&ReportRecord, f64)> = records
        .iter()
        .filter_map(|record| record.scored_performance().map(|score| (record, score)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.into_iter().take(TOP_N).map(|(record, _)| record).collect()
}

/// Records with at least one leave day, most first. Ties keep input order.
pub fn most_leaves(records: &[ReportRecord]) -> Vec<&ReportRecord> {
    let mut ranked: Vec<&ReportRecord> =
        records.iter().filter(|record| record.leaves > 0).collect();
    ranked.sort_by(|a, b| b.leaves.cmp(&a.leaves));
    ranked.truncate(TOP_N);
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub department: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_records: usize,
    pub total_amount: f64,
    pub department_stats: DepartmentStats,
    pub overall_performance: f64,
    pub overall_leaves: u32,
    pub top_performers: Vec<RankedEntry>,
    pub most_leaves: Vec<RankedEntry>,
    pub monthly_series: MonthlySeries,
}

pub fn summarize(records: &[ReportRecord]) -> ReportSummary {
    let rank = |record: &ReportRecord, value: f64| RankedEntry {
        name: record.name.clone(),
        department: record.department_key().to_string(),
        value,
    };

    ReportSummary {
        total_records: records.len(),
        total_amount: total_amount(records),
        department_stats: DepartmentStats::from_records(records),
        overall_performance: overall_performance(records),
        overall_leaves: overall_leaves(records),
        top_performers: top_performers(records)
            .into_iter()
            .map(|record| rank(record, record.performance.unwrap_or(0.0)))
            .collect(),
        most_leaves: most_leaves(records)
            .into_iter()
            .map(|record| rank(record, f64::from(record.leaves)))
            .collect(),
        monthly_series: MonthlySeries::from_records(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(
        name: &str,
        department: &str,
        salary: f64,
        score: f64,
        leaves: u32,
    ) -> ReportRecord {
        ReportRecord {
            department: Some(department.to_string()),
            amount: Some(salary),
            performance: Some(score),
            leaves,
            month: Some(Month::June),
            ..ReportRecord::named(name)
        }
    }

    #[test]
    fn departments_keep_first_seen_order() {
        let records = vec![
            employee("Priya", "IT", 60000.0, 4.2, 1),
            employee("Amit", "HR", 50000.0, 4.5, 2),
            employee("Deepak", "IT", 61000.0, 4.1, 2),
        ];
        let stats = DepartmentStats::from_records(&records);
        let order: Vec<_> = stats.iter().map(|(name, _)| name).collect();
        assert_eq!(order, ["IT", "HR"]);
        assert_eq!(stats.get("IT").map(|s| s.count), Some(2));
        assert_eq!(stats.total_count(), records.len());
    }

    #[test]
    fn missing_departments_share_one_bucket() {
        let mut lone = ReportRecord::named("Temp");
        lone.amount = Some(1000.0);
        let stats = DepartmentStats::from_records(&[lone.clone(), lone]);
        let unknown = stats.get(super::super::record::UNKNOWN_DEPARTMENT).expect("bucket");
        assert_eq!(unknown.count, 2);
        assert_eq!(unknown.total_salary, 2000.0);
    }

    #[test]
    fn performance_mean_skips_missing_and_zero_scores() {
        let mut unscored = ReportRecord::named("New");
        unscored.performance = None;
        let mut zero = ReportRecord::named("Zero");
        zero.performance = Some(0.0);
        let records = vec![
            employee("Amit", "HR", 0.0, 4.0, 0),
            unscored,
            zero,
            employee("Priya", "IT", 0.0, 5.0, 0),
        ];
        assert_eq!(overall_performance(&records), 4.5);
        assert_eq!(overall_performance(&[]), 0.0);
    }

    #[test]
    fn rankings_are_stable_and_capped() {
        let records = vec![
            employee("A", "HR", 0.0, 4.0, 1),
            employee("B", "HR", 0.0, 4.8, 3),
            employee("C", "HR", 0.0, 4.0, 3),
            employee("D", "HR", 0.0, 4.0, 0),
            employee("E", "HR", 0.0, 3.0, 1),
        ];
        let top: Vec<_> = top_performers(&records).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(top, ["B", "A", "C"]);

        let leaves: Vec<_> = most_leaves(&records).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(leaves, ["B", "C", "A"]);
    }

    #[test]
    fn monthly_series_always_has_twelve_entries() {
        let series = MonthlySeries::from_records(&[]);
        assert_eq!(series.len(), 12);
        assert_eq!(series.iter().next().map(|m| m.month), Some(Month::January));
        assert!(series.iter().all(|m| m.total == 0.0 && m.leaves == 0));
    }

    #[test]
    fn pending_entries_add_amounts_but_not_leaves() {
        let mut pending = employee("Amit", "HR", 100.0, 0.0, 4);
        pending.pending = true;
        let settled = employee("Priya", "IT", 50.0, 0.0, 2);
        let series = MonthlySeries::from_records(&[pending, settled]);
        assert_eq!(series.get(Month::June).total, 150.0);
        assert_eq!(series.get(Month::June).leaves, 2);
    }

    #[test]
    fn department_stats_serialize_as_ordered_map() {
        let records = vec![
            employee("Ravi", "Finance", 45000.0, 3.9, 0),
            employee("Amit", "HR", 50000.0, 4.5, 0),
        ];
        let json = serde_json::to_string(&DepartmentStats::from_records(&records))
            .expect("serializes");
        let finance = json.find("Finance").expect("finance present");
        let hr = json.find("HR").expect("hr present");
        assert!(finance < hr);
        assert!(json.contains("\"totalSalary\":45000.0"));
    }
}
