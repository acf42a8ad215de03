//! Time filtering for polling triggers.
//!
//! A trigger asks the vendor for records created since the last run (where
//! the API supports it), then re-filters the result client-side against each
//! record's own timestamp. Records whose timestamp is missing or unparseable
//! are skipped rather than failing the poll.

use crate::JsonValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

/// Which records a poll should return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollWindow {
    /// First poll: everything the vendor returns.
    All,
    /// Only records strictly newer than this instant.
    Since(DateTime<Utc>),
}

impl PollWindow {
    pub fn since(&self) -> Option<DateTime<Utc>> {
        match self {
            PollWindow::All => None,
            PollWindow::Since(t) => Some(*t),
        }
    }
}

/// Unix seconds above this are treated as milliseconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Parses a vendor timestamp.
///
/// Accepts RFC 3339, ISO 8601 with a `+0000` style offset, naive
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC), a bare
/// date, and Unix seconds or milliseconds as numbers or numeric strings.
pub fn parse_timestamp(value: &JsonValue) -> Option<DateTime<Utc>> {
    match value {
        JsonValue::Number(n) => n.as_i64().and_then(from_unix),
        JsonValue::String(s) => parse_timestamp_str(s),
        _ => None,
    }
}

pub fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(t) = DateTime::parse_from_str(s, format) {
            return Some(t.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&t));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|t| Utc.from_utc_datetime(&t));
    }
    s.parse::<i64>().ok().and_then(from_unix)
}

fn from_unix(n: i64) -> Option<DateTime<Utc>> {
    if n.unsigned_abs() > MILLIS_THRESHOLD as u64 {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    }
}

/// Looks up a dotted path (`"fields.created"`) inside a record.
///
/// An empty path returns the record itself.
pub fn lookup<'a>(record: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    if path.is_empty() {
        return Some(record);
    }
    path.split('.')
        .try_fold(record, |value, segment| value.get(segment))
}

/// Keeps the records created after the window's start.
///
/// With [`PollWindow::All`] every record is kept. With
/// [`PollWindow::Since`] a record survives only if its `field` parses and is
/// strictly later than the window start.
pub fn filter_since(records: Vec<JsonValue>, field: &str, window: &PollWindow) -> Vec<JsonValue> {
    let Some(since) = window.since() else {
        return records;
    };
    records
        .into_iter()
        .filter(|record| match lookup(record, field).and_then(parse_timestamp) {
            Some(t) => t > since,
            None => {
                debug!(field = field, "Skipping record without a usable timestamp");
                false
            }
        })
        .collect()
}

/// Like [`filter_since`] but takes the records from an array inside a response.
pub fn filter_array_since(response: &JsonValue, array_path: &str, field: &str, window: &PollWindow) -> Vec<JsonValue> {
    let records = lookup(response, array_path)
        .and_then(JsonValue::as_array)
        .cloned()
        .unwrap_or_default();
    filter_since(records, field, window)
}
