//! Timestamp normalization at the content-store boundary.
//!
//! # Responsibility
//! - Accept every timestamp shape the external store emits.
//! - Convert them into one canonical epoch-millisecond value.
//!
//! # Invariants
//! - Normalization never fails; unusable input becomes `None`.
//! - Naive date-times are read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Timestamp as received from the external content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Epoch milliseconds.
    Millis(i64),
    /// Epoch milliseconds with a fractional part.
    Fractional(f64),
    /// ISO-8601 text.
    Text(String),
    /// Materialized store timestamp (`seconds` + `nanoseconds`).
    Seconds {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds")]
        nanoseconds: u32,
    },
    /// Any other JSON value.
    Unrecognized(serde_json::Value),
}

impl RawTimestamp {
    /// Converts to epoch milliseconds, or `None` when unusable.
    pub fn to_millis(&self) -> Option<i64> {
        match self {
            Self::Millis(value) => Some(*value),
            Self::Fractional(value) if value.is_finite() => Some(value.trunc() as i64),
            Self::Fractional(_) => None,
            Self::Text(text) => parse_timestamp_text(text),
            Self::Seconds {
                seconds,
                nanoseconds,
            } => seconds
                .checked_mul(1000)
                .and_then(|ms| ms.checked_add(i64::from(*nanoseconds / 1_000_000))),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Normalizes an optional raw timestamp into epoch milliseconds.
pub fn normalize_timestamp(raw: Option<&RawTimestamp>) -> Option<i64> {
    raw.and_then(RawTimestamp::to_millis)
}

/// Maps a missing timestamp to `0`, the oldest representable instant.
pub fn millis_or_zero(value: Option<i64>) -> i64 {
    value.unwrap_or(0)
}

/// Parses ISO-8601 text into epoch milliseconds.
///
/// Accepts RFC 3339 with offset, naive `YYYY-MM-DDTHH:MM:SS[.fff]` (UTC), and
/// date-only `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp_text(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Converts a non-negative millisecond span into days.
pub fn millis_to_days(millis: i64) -> f64 {
    millis as f64 / MILLIS_PER_DAY as f64
}

/// Rounds to one decimal place.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        assert_eq!(
            parse_timestamp_text("1970-01-01T01:00:00+01:00"),
            Some(0)
        );
    }

    #[test]
    fn parses_naive_and_date_only_as_utc() {
        assert_eq!(parse_timestamp_text("1970-01-02T00:00:00"), Some(MILLIS_PER_DAY));
        assert_eq!(parse_timestamp_text("1970-01-02"), Some(MILLIS_PER_DAY));
    }

    #[test]
    fn rejects_garbage_text() {
        assert_eq!(parse_timestamp_text("yesterday"), None);
        assert_eq!(parse_timestamp_text("   "), None);
    }

    #[test]
    fn seconds_object_keeps_millisecond_precision() {
        let raw = RawTimestamp::Seconds {
            seconds: 2,
            nanoseconds: 345_678_901,
        };
        assert_eq!(raw.to_millis(), Some(2_345));
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_one_decimal(1.25), 1.3);
        assert_eq!(round_one_decimal(2.04), 2.0);
    }
}
