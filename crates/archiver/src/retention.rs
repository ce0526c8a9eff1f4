//! Parsing of Planka timestamps for the retention filter.
//!
//! Planka serialises times as ISO-8601 with millisecond precision and a literal
//! `Z` suffix (`2025-12-15T11:42:21.079Z`). Values that carry no offset at all
//! are interpreted as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::Timestamp;

/// Parses a server timestamp, returning `None` for empty or malformed input.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let normalised = match raw.strip_suffix('Z') {
        Some(stem) => format!("{stem}+00:00"),
        None => raw.to_owned(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
        return Some(Timestamp::from_utc(dt.with_timezone(&Utc)));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(&normalised, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Timestamp::from_utc(naive.and_utc()));
    }

    NaiveDate::parse_from_str(&normalised, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Timestamp::from_utc(naive.and_utc()))
}
