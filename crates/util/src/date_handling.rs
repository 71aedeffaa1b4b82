//! # Date Handling Utilities
//!
//! This module formats notification timestamps for display: a compact
//! relative age ("5m ago") for recent records and an absolute local date for
//! anything a week old or older.

use chrono::{DateTime, Datelike, Local, Utc};

const MILLIS_PER_MINUTE: i64 = 60_000;
const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_DAY: i64 = 86_400_000;
const DAYS_SHOWN_AS_RELATIVE: i64 = 7;

/// Formats the age of `timestamp` relative to `now`.
///
/// Both instants are reduced to whole epoch milliseconds before subtracting,
/// so sub-millisecond precision lost in storage never changes the result.
/// Buckets are computed with integer floor division of the elapsed
/// milliseconds, so a value sitting exactly on a threshold lands in the
/// larger bucket (60 minutes reads as "1h ago", 7 days as a date).
/// Timestamps in the future read as "now".
///
/// # Arguments
/// * `timestamp` - The instant being described
/// * `now` - The reference instant
///
/// # Returns
/// One of "now", "`N`m ago", "`N`h ago", "`N`d ago" or an absolute date
///
/// # Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use leaddash_util::date_handling::relative_age;
///
/// let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
/// assert_eq!(relative_age(now - Duration::seconds(59), now), "now");
/// assert_eq!(relative_age(now - Duration::minutes(5), now), "5m ago");
/// assert_eq!(relative_age(now - Duration::minutes(60), now), "1h ago");
/// assert_eq!(relative_age(now - Duration::hours(49), now), "2d ago");
/// ```
pub fn relative_age(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_millis = (now.timestamp_millis() - timestamp.timestamp_millis()).max(0);

    let minutes = elapsed_millis / MILLIS_PER_MINUTE;
    let hours = elapsed_millis / MILLIS_PER_HOUR;
    let days = elapsed_millis / MILLIS_PER_DAY;

    if minutes < 1 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < DAYS_SHOWN_AS_RELATIVE {
        format!("{days}d ago")
    } else {
        format_absolute_date(timestamp)
    }
}

/// Formats a timestamp as MM/DD/YYYY in the local time zone.
///
/// # Example
/// ```rust
/// use chrono::{Local, TimeZone, Utc};
/// use leaddash_util::date_handling::format_absolute_date;
///
/// let instant = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
/// let local = instant.with_timezone(&Local).date_naive();
/// assert_eq!(format_absolute_date(instant), local.format("%m/%d/%Y").to_string());
/// ```
pub fn format_absolute_date(timestamp: DateTime<Utc>) -> String {
    let date = timestamp.with_timezone(&Local).date_naive();
    format!("{:02}/{:02}/{}", date.month(), date.day(), date.year())
}
