//! Upstream date parsing.

use crate::sources::RawDate;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse any upstream date encoding into a UTC calendar date.
#[must_use]
pub fn parse_raw_date(raw: &RawDate) -> Option<NaiveDate> {
    match raw {
        RawDate::Millis(millis) => date_from_millis(*millis),
        RawDate::Text(text) => parse_text_date(text),
        RawDate::Extended { date } => parse_raw_date(date),
        RawDate::NumberLong { millis } => millis.trim().parse().ok().and_then(date_from_millis),
    }
}

/// Parse ISO 8601 text, with or without zone and fractional seconds, or a
/// bare `YYYY-MM-DD`.
#[must_use]
pub fn parse_text_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

fn date_from_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// Render a raw date for error messages.
pub(crate) fn describe(raw: &RawDate) -> String {
    match raw {
        RawDate::Millis(millis) => millis.to_string(),
        RawDate::Text(text) => text.clone(),
        RawDate::Extended { date } => describe(date),
        RawDate::NumberLong { millis } => millis.clone(),
    }
}
