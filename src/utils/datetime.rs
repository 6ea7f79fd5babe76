//! Date and time utility functions
//!
//! The backend emits timestamps in several shapes (RFC 3339 with offset, naive
//! ISO 8601, space separated). This module parses all of them into UTC and
//! formats them for display, and computes the default report date range.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Date format used for API query parameters (`start_date`, `end_date`)
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date string in YYYY-MM-DD format to NaiveDate
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str.trim(), API_DATE_FORMAT)
}

/// Format a NaiveDate to YYYY-MM-DD string
pub fn format_ymd(d: NaiveDate) -> String {
    d.format(API_DATE_FORMAT).to_string()
}

/// Format current local date to YYYY-MM-DD string
pub fn format_today() -> String {
    format_ymd(Local::now().date_naive())
}

/// Parse a backend timestamp into UTC.
///
/// Accepts RFC 3339 (`2025-04-30T10:25:00Z`, `2025-04-30T10:25:00.123+03:00`),
/// naive ISO 8601 (`2025-04-30T10:25:00`), space separated
/// (`2025-04-30 10:25:00`) and plain dates. Naive values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    parse_date(raw)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format a timestamp in local time with the configured date and time formats
pub fn format_timestamp(ts: &DateTime<Utc>, date_format: &str, time_format: &str) -> String {
    let local = ts.with_timezone(&Local);
    format!("{} {}", local.format(date_format), local.format(time_format))
}

/// Format an optional timestamp, `fallback` when missing
pub fn format_optional_timestamp(
    ts: Option<&DateTime<Utc>>,
    date_format: &str,
    time_format: &str,
    fallback: &str,
) -> String {
    ts.map(|t| format_timestamp(t, date_format, time_format))
        .unwrap_or_else(|| fallback.to_string())
}

/// First day of the month containing `day`
pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Inclusive date range used by reports and penalty queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// The last `days` days ending at `today` (inclusive)
    pub fn last_days(today: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self::new(today - Duration::days(span), today)
    }

    /// From the first of the current month up to `today`
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self::new(month_start(today), today)
    }

    /// Parse a `YYYY-MM-DD..YYYY-MM-DD` string
    pub fn parse(input: &str) -> Option<Self> {
        let (start, end) = input.split_once("..")?;
        Some(Self::new(parse_date(start).ok()?, parse_date(end).ok()?))
    }

    pub fn start_param(&self) -> String {
        format_ymd(self.start)
    }

    pub fn end_param(&self) -> String {
        format_ymd(self.end)
    }

    /// Whether a timestamp falls on a day inside the range
    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        let day = ts.date_naive();
        day >= self.start && day <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start_param(), self.end_param())
    }
}
