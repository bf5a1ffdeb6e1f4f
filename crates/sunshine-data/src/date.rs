//! Day normalization for stored weather dates.
//!
//! Every `date` value written to or queried from the weather table is the
//! start of its UTC calendar day, in milliseconds. Comparisons all over the
//! data layer assume this normalization holds for every stored row.

use chrono::{DateTime, NaiveDate, Utc};

/// Milliseconds in one day
pub const DAY_IN_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Truncate a millisecond timestamp to the start of its UTC day.
///
/// Idempotent: `normalize_date(normalize_date(t)) == normalize_date(t)`.
/// Uses floored division so pre-epoch timestamps also truncate toward the
/// earlier day boundary rather than toward zero.
pub fn normalize_date(millis: i64) -> i64 {
    millis.div_euclid(DAY_IN_MILLIS) * DAY_IN_MILLIS
}

/// Whether a timestamp already sits on a UTC day boundary.
pub fn is_normalized(millis: i64) -> bool {
    normalize_date(millis) == millis
}

/// The start of the current UTC day, in milliseconds.
pub fn normalized_utc_now() -> i64 {
    normalize_date(Utc::now().timestamp_millis())
}

/// Calendar date for a millisecond timestamp, if representable.
pub fn date_for_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}
