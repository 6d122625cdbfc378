//! Per-employee attendance statistics.

use chrono::NaiveDate;
use serde::Serialize;

use crate::records::{AttendanceEntry, AttendanceStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceMark {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl From<(NaiveDate, AttendanceStatus)> for AttendanceMark {
    fn from((date, status): (NaiveDate, AttendanceStatus)) -> Self {
        Self { date, status }
    }
}

impl From<&AttendanceEntry> for AttendanceMark {
    fn from(entry: &AttendanceEntry) -> Self {
        Self {
            date: entry.date,
            status: entry.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub present: usize,
    pub absent: usize,
    pub present_pct: f64,
    pub absent_pct: f64,
    pub longest_streak: usize,
}

impl AttendanceSummary {
    /// Counts marks in the order given. The streak is only meaningful when callers pass
    /// marks sorted by date.
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let mut present = 0;
        let mut absent = 0;
        let mut streak = 0;
        let mut longest_streak = 0;

        for status in statuses {
            match status {
                AttendanceStatus::Present => {
                    present += 1;
                    streak += 1;
                    longest_streak = longest_streak.max(streak);
                }
                AttendanceStatus::Absent => {
                    absent += 1;
                    streak = 0;
                }
            }
        }

        let total = present + absent;
        Self {
            present,
            absent,
            present_pct: percentage(present, total),
            absent_pct: percentage(absent, total),
            longest_streak,
        }
    }

    pub fn from_marks(marks: &[AttendanceMark]) -> Self {
        Self::from_statuses(marks.iter().map(|mark| mark.status))
    }

    pub fn total(&self) -> usize {
        self.present + self.absent
    }
}

/// Share of `part` in `total` as a percentage rounded to one decimal, 0 when `total` is 0.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(part as f64 * 100.0 / total as f64, 1)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
