//! Daily OHLCV bar representation and date normalization.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::error::MarketError;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Convert a serialized date-like value to a calendar date.
///
/// Accepts plain dates (`2024-01-02`, `2024/01/02`, `20240102`), naive
/// date-times and RFC 3339 timestamps; the time of day is discarded.
pub fn parse_bar_date(value: &str) -> Result<NaiveDate, MarketError> {
    let trimmed = value.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.date_naive());
    }

    Err(MarketError::InvalidDate {
        value: value.to_string(),
        reason: "unrecognized date format".into(),
    })
}

/// Sort bars ascending by date. One bar per calendar day, so no tie-break.
pub fn sort_by_date(bars: &mut [OhlcvBar]) {
    bars.sort_by_key(|b| b.date);
}
