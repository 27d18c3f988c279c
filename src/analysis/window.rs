//! Report windows and timestamp parsing.
//!
//! Stored records carry timestamps in several shapes: RFC 3339 strings,
//! naive date-times, bare dates, bare years, and epoch milliseconds. All of
//! them are read as UTC instants here. A digit string is a year when it has
//! four digits and epoch milliseconds when it has ten or more; other lengths
//! are rejected.

use crate::error::ReportError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Shorter digit strings are not treated as epoch milliseconds (anything
/// below this is before 1970-01-12).
const MIN_EPOCH_MILLIS_DIGITS: usize = 10;

/// Inclusive time range a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReportWindow {
    /// Create a window, rejecting `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds from user input.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ReportError> {
        let start = parse_bound("start", start)?;
        let end = parse_bound("end", end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Whether `ts` falls inside the window, bounds included.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }

    /// Whole days spanned by the window, rounded up, never less than one.
    pub fn days(&self) -> u64 {
        let millis = (self.end - self.start).num_milliseconds() as f64;
        let days = (millis / MILLIS_PER_DAY).ceil() as u64;
        days.max(1)
    }
}

fn parse_bound(which: &'static str, value: Option<&str>) -> Result<DateTime<Utc>, ReportError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ReportError::MissingBound { which })?;

    parse_timestamp_str(value).ok_or_else(|| ReportError::UnparsableBound {
        which,
        value: value.to_string(),
    })
}

/// Parse a raw JSON timestamp value.
///
/// Strings go through [`parse_timestamp_str`]; integer numbers are epoch
/// milliseconds. Anything else yields `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        _ => None,
    }
}

/// Parse a timestamp string.
pub fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    if raw.chars().all(|c| c.is_ascii_digit()) {
        return match raw.len() {
            4 => raw
                .parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc()),
            len if len >= MIN_EPOCH_MILLIS_DIGITS => raw
                .parse::<i64>()
                .ok()
                .and_then(DateTime::from_timestamp_millis),
            _ => None,
        };
    }

    None
}
