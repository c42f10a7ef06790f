//! Calendar date utilities
//!
//! Everything that crosses the date-only/instant boundary goes through here.
//! Date labels are zero-padded "YYYY-MM-DD", so lexicographic ordering agrees
//! with chronological ordering and map lookups stay exact. Labels are
//! UTC-midnight anchored; a user's timezone setting never shifts them.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use super::{AnalyticsError, AnalyticsResult};

/// Canonical date label format
const DATE_FMT: &str = "%Y-%m-%d";

/// Parse a "YYYY-MM-DD" label into a calendar date
pub fn parse_date_label(label: &str) -> AnalyticsResult<NaiveDate> {
    NaiveDate::parse_from_str(label, DATE_FMT)
        .map_err(|_| AnalyticsError::InvalidDate(label.to_string()))
}

/// Format a calendar date as its canonical label
pub fn date_label(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// Return the label n days after the given one (n may be negative)
///
/// Pure calendar arithmetic: exact across month and year boundaries, no
/// time-of-day or DST involvement.
pub fn add_days(label: &str, n: i64) -> AnalyticsResult<String> {
    let date = parse_date_label(label)?;
    let shifted = date
        .checked_add_signed(Duration::days(n))
        .ok_or_else(|| AnalyticsError::InvalidDate(format!("{} {:+} days", label, n)))?;
    Ok(date_label(shifted))
}

/// Project a stored UTC instant down to its calendar-date label
///
/// Uses the instant's own encoded date fields; accepts RFC 3339
/// ("2025-01-09T12:30:00Z") and SQLite's "2025-01-09 12:30:00" form.
pub fn instant_date_label(instant: &str) -> AnalyticsResult<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(instant) {
        return Ok(date_label(dt.with_timezone(&Utc).date_naive()));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(instant, "%Y-%m-%d %H:%M:%S") {
        return Ok(date_label(dt.date()));
    }
    Err(AnalyticsError::InvalidDate(instant.to_string()))
}
