//! Timestamp value generators.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rand::Rng;

/// Generate the current UTC timestamp.
///
/// This is NOT deterministic - each call returns the current time.
pub fn generate_timestamp_now() -> DateTime<Utc> {
    Utc::now()
}

/// Generate a random timestamp between `start` and `end`, inclusive at full
/// precision. Returns `start` when the range is empty.
///
/// Spans too wide for nanosecond offsets fall back to millisecond offsets.
pub fn generate_timestamp_range<R: Rng>(
    rng: &mut R,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> DateTime<Utc> {
    if start >= end {
        return start;
    }

    let span = end - start;
    let offset = match span.num_nanoseconds() {
        Some(nanos) => TimeDelta::nanoseconds(rng.random_range(0..=nanos)),
        None => TimeDelta::milliseconds(rng.random_range(0..=span.num_milliseconds())),
    };

    start.checked_add_signed(offset).unwrap_or(start)
}

/// Parse a timestamp string in various formats.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC 3339 / ISO 8601
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Try common date-only format
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
