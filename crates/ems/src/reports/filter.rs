use std::borrow::Cow;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::records::{Department, Employee, LeaveRequest, SalaryRecord};

use super::record::ReportRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Name,
    Department,
    Month,
    Position,
    Code,
}

impl SearchField {
    /// Fields matched by the reports view.
    pub const REPORT: &'static [SearchField] = &[SearchField::Name, SearchField::Department];
    /// Fields matched by the employee directory.
    pub const EMPLOYEE: &'static [SearchField] = &[
        SearchField::Name,
        SearchField::Department,
        SearchField::Position,
        SearchField::Code,
    ];
    /// Fields matched by the salary ledger.
    pub const SALARY: &'static [SearchField] = &[
        SearchField::Name,
        SearchField::Department,
        SearchField::Month,
    ];
}

/// A record whose text fields can be searched.
pub trait Searchable {
    fn field(&self, field: SearchField) -> Option<Cow<'_, str>>;
}

impl Searchable for ReportRecord {
    fn field(&self, field: SearchField) -> Option<Cow<'_, str>> {
        match field {
            SearchField::Name => Some(Cow::Borrowed(&self.name)),
            SearchField::Department => self.department.as_deref().map(Cow::Borrowed),
            SearchField::Month => self.month.map(|month| Cow::Borrowed(month.label())),
            SearchField::Position => Some(Cow::Borrowed(&self.position)),
            SearchField::Code => self.code.as_deref().map(Cow::Borrowed),
        }
    }
}

impl Searchable for Employee {
    fn field(&self, field: SearchField) -> Option<Cow<'_, str>> {
        match field {
            SearchField::Name => Some(Cow::Borrowed(&self.name)),
            SearchField::Department => Some(Cow::Borrowed(&self.department)),
            SearchField::Month => self.salary_month.map(|month| Cow::Borrowed(month.label())),
            SearchField::Position => Some(Cow::Borrowed(&self.position)),
            SearchField::Code => Some(Cow::Borrowed(self.code.as_str())),
        }
    }
}

impl Searchable for SalaryRecord {
    fn field(&self, field: SearchField) -> Option<Cow<'_, str>> {
        match field {
            SearchField::Name => Some(Cow::Borrowed(&self.employee_name)),
            SearchField::Department => self.department.as_deref().map(Cow::Borrowed),
            SearchField::Month => Some(Cow::Borrowed(self.month.label())),
            SearchField::Position | SearchField::Code => None,
        }
    }
}

impl Searchable for LeaveRequest {
    fn field(&self, field: SearchField) -> Option<Cow<'_, str>> {
        match field {
            SearchField::Name => Some(Cow::Borrowed(&self.employee_name)),
            SearchField::Department => self.department.as_deref().map(Cow::Borrowed),
            SearchField::Month => Some(Cow::Owned(self.from.format("%B").to_string())),
            SearchField::Position | SearchField::Code => None,
        }
    }
}

impl Searchable for Department {
    fn field(&self, field: SearchField) -> Option<Cow<'_, str>> {
        match field {
            SearchField::Name | SearchField::Department => Some(Cow::Borrowed(&self.name)),
            _ => None,
        }
    }
}

/// Case-insensitive substring match of `query` against any of `fields`.
pub fn matches<T: Searchable + ?Sized>(record: &T, query: &str, fields: &[SearchField]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|field| {
        record
            .field(*field)
            .is_some_and(|value| value.to_lowercase().contains(&needle))
    })
}

/// Records matching `query`. A blank query keeps everything.
pub fn filter_records<T>(records: &[T], query: &str, fields: &[SearchField]) -> Vec<T>
where
    T: Searchable + Clone,
{
    records
        .iter()
        .filter(|record| matches(*record, query, fields))
        .cloned()
        .collect()
}

/// Join/exit window used by the reports view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Drops records that joined before `from`, joined after `to`, or left before `from`.
    /// Records without dates are kept.
    pub fn keeps(&self, join: Option<NaiveDate>, exit: Option<NaiveDate>) -> bool {
        if let (Some(from), Some(join)) = (self.from, join) {
            if join < from {
                return false;
            }
        }
        if let (Some(to), Some(join)) = (self.to, join) {
            if join > to {
                return false;
            }
        }
        if let (Some(from), Some(exit)) = (self.from, exit) {
            if exit < from {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, records: Vec<ReportRecord>) -> Vec<ReportRecord> {
        if self.is_open() {
            return records;
        }
        records
            .into_iter()
            .filter(|record| self.keeps(record.join_date, record.exit_date))
            .collect()
    }
}
