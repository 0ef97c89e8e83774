use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone, Utc};

use super::ReportError;

/// Short English month names, indexed by `month0`.
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Longest lookback for which every month in the window has a distinct short name.
pub const MAX_LOOKBACK_MONTHS: u32 = 11;

/// Parse a reference date given as `YYYY-MM-DD` or as an RFC 3339 timestamp.
///
/// Timestamps contribute their UTC calendar date.
pub fn parse_reference_date(raw: &str) -> Result<NaiveDate, ReportError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ReportError::MissingDate);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| ReportError::InvalidDate(raw.to_string()))
}

/// Parse an optional reference date, treating `None` as missing.
pub fn require_reference_date(raw: Option<&str>) -> Result<NaiveDate, ReportError> {
    parse_reference_date(raw.ok_or(ReportError::MissingDate)?)
}

pub(crate) fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

/// The day after `date` at midnight, the exclusive end of any window that
/// includes `date`.
pub(crate) fn end_of_day(date: NaiveDate) -> Result<DateTime<Utc>, ReportError> {
    date.checked_add_days(Days::new(1))
        .map(midnight)
        .ok_or(ReportError::DateOutOfRange)
}

/// Half-open `[start, end)` window of whole months ending on a reference date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    /// `(year, month)` pairs from the start month through the reference month
    months: Vec<(i32, u32)>,
}

impl ReportWindow {
    /// Window starting on the first day of the month `lookback` months before
    /// the reference month and ending after the reference date.
    pub fn months_back(reference: NaiveDate, lookback: u32) -> Result<Self, ReportError> {
        let lookback = lookback.min(MAX_LOOKBACK_MONTHS);
        let first_of_month = reference
            .with_day(1)
            .ok_or(ReportError::DateOutOfRange)?;
        let first = first_of_month
            .checked_sub_months(Months::new(lookback))
            .ok_or(ReportError::DateOutOfRange)?;

        let mut months = Vec::with_capacity(lookback as usize + 1);
        let mut cursor = first;
        while cursor <= first_of_month {
            months.push((cursor.year(), cursor.month()));
            cursor = cursor
                .checked_add_months(Months::new(1))
                .ok_or(ReportError::DateOutOfRange)?;
        }

        Ok(Self {
            start: midnight(first),
            end: end_of_day(reference)?,
            months,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts < self.end
    }

    /// Seeded `(year, month)` keys in chronological order.
    pub fn months(&self) -> &[(i32, u32)] {
        &self.months
    }
}

/// Short display name for a month number (1-12).
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

/// Window from `months` calendar months before the reference date through the
/// end of the reference date.
pub fn trailing_months(
    reference: NaiveDate,
    months: u32,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ReportError> {
    let start = reference
        .checked_sub_months(Months::new(months))
        .ok_or(ReportError::DateOutOfRange)?;
    Ok((midnight(start), end_of_day(reference)?))
}
