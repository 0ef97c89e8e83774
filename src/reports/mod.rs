//! Role-scoped label statistics.
//!
//! Everything here is pure: the service layer resolves the visible
//! manufacturers and fetches matching label rows, then hands them to
//! [`build`] together with the [`ReportWindow`] they were selected with.

mod daily;
mod scope;
mod window;

use chrono::Datelike;
use serde::{Serialize, Serializer, ser::SerializeMap};
use thiserror::Error;

pub use daily::{daily_counts, keep_busy_days};
pub(crate) use scope::narrow;
pub(crate) use window::{end_of_day, midnight};
pub use scope::{ReportScope, ScopeRole};
pub use window::{
    MAX_LOOKBACK_MONTHS, ReportWindow, month_name, parse_reference_date, require_reference_date,
    trailing_months,
};

use crate::models::LabelReportRow;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("date is required")]
    MissingDate,

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("date is out of range")]
    DateOutOfRange,
}

/// Label counts per month, in window order, serialized as a JSON object
/// keyed by short month name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonthCounts(Vec<(String, u64)>);

impl MonthCounts {
    pub fn get(&self, month: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(name, _)| name == month)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| count).sum()
    }
}

impl Serialize for MonthCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCount {
    pub name: String,
    pub count: u64,
    /// Share of the window's labels, rounded to the nearest whole percent
    pub percent: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    pub brands: i64,
    pub products: i64,
    pub admins: i64,
    pub labels: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelReport {
    pub user_counts: Vec<UserCount>,
    pub total_labels: u64,
    pub month_counts: MonthCounts,
    pub totals: ReportTotals,
}

impl LabelReport {
    /// A report with every month seeded to zero and no users.
    pub fn empty(window: &ReportWindow, totals: ReportTotals) -> Self {
        build(window, &[], totals)
    }
}

fn percent_of(count: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u64
}

/// Bucket label rows by month and by issuing user.
///
/// Rows outside the window are ignored so both bucket sums always equal
/// `total_labels`. Users appear in the order their first label was seen.
pub fn build(window: &ReportWindow, rows: &[LabelReportRow], totals: ReportTotals) -> LabelReport {
    let mut months: Vec<((i32, u32), u64)> = window.months().iter().map(|m| (*m, 0)).collect();
    let mut users: Vec<(String, u64)> = Vec::new();
    let mut total = 0u64;

    for row in rows.iter().filter(|row| window.contains(row.created_at)) {
        let key = (row.created_at.year(), row.created_at.month());
        let Some(slot) = months.iter_mut().find(|(m, _)| *m == key) else {
            continue;
        };
        slot.1 += 1;
        total += 1;

        match users.iter_mut().find(|(name, _)| *name == row.user_name) {
            Some((_, count)) => *count += 1,
            None => users.push((row.user_name.clone(), 1)),
        }
    }

    LabelReport {
        user_counts: users
            .into_iter()
            .map(|(name, count)| UserCount {
                name,
                count,
                percent: percent_of(count, total),
            })
            .collect(),
        total_labels: total,
        month_counts: MonthCounts(
            months
                .into_iter()
                .map(|((_, month), count)| (month_name(month).to_string(), count))
                .collect(),
        ),
        totals,
    }
}
