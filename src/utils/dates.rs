//! Loose calendar-date parsing.
//!
//! Accepts the date shapes commonly found in page metadata and user input:
//! ISO 8601 / RFC 3339 timestamps, RFC 2822, numeric dates, and written-out
//! month names with or without ordinal suffixes.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Date-only layouts, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b. %d, %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d %b. %Y",
    "%Y, %B %d",
    "%A, %B %d, %Y",
];

/// Timestamp layouts without a zone, tried in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

static ORDINAL_SUFFIX: OnceLock<Regex> = OnceLock::new();

fn ordinal_suffix() -> &'static Regex {
    ORDINAL_SUFFIX.get_or_init(|| Regex::new(r"(\d)(?:st|nd|rd|th)\b").expect("valid regex"))
}

/// Parse a loosely formatted date string into a calendar date.
///
/// A bare year ("2020") is not a calendar date and yields `None`, so callers
/// that fall back to the raw string keep it as-is.
pub fn parse_loose_date(raw: &str) -> Option<NaiveDate> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    let input = ordinal_suffix().replace_all(&collapsed, "$1");
    let input = input.as_ref();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
    }

    // Timestamps with trailing noise still carry a usable ISO date prefix
    if input.len() > 10 && input.is_char_boundary(10) {
        if let Ok(date) = NaiveDate::parse_from_str(&input[..10], "%Y-%m-%d") {
            return Some(date);
        }
    }

    None
}
