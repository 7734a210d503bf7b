//! Timestamps and year fractions.
//!
//! Valuation times and expiries are naive (timezone-less) timestamps. Time
//! to expiry is the elapsed wall-clock time expressed as a fraction of a
//! 365-day year.

use crate::{Real, Time};
use chrono::NaiveDateTime;

/// A point in time used for valuation times and expiries.
pub type Timestamp = NaiveDateTime;

/// Number of seconds in a 365-day year.
pub const SECONDS_IN_A_YEAR: Real = 365.0 * 24.0 * 60.0 * 60.0;

/// Fraction of a 365-day year elapsed between `start` and `end`.
///
/// Negative when `end` precedes `start`.
pub fn year_fraction(start: Timestamp, end: Timestamp) -> Time {
    let elapsed = end.signed_duration_since(start);
    let seconds = match elapsed.num_nanoseconds() {
        Some(ns) => ns as Real * 1e-9,
        // beyond ~292 years nanoseconds overflow i64
        None => elapsed.num_milliseconds() as Real * 1e-3,
    };
    seconds / SECONDS_IN_A_YEAR
}
