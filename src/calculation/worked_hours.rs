//! Worked-hours measurement for housekeeping tasks.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);

/// Returns the hours between `start` and `end`.
///
/// Hours are fractional and never rounded; a task that ends before it
/// starts contributes zero.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use hotel_ops::calculation::worked_hours;
/// use rust_decimal::Decimal;
///
/// let start = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
/// let end = start + Duration::minutes(45);
/// assert_eq!(worked_hours(start, end), Decimal::new(75, 2)); // 0.75 hours
/// ```
pub fn worked_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(seconds) / SECONDS_PER_HOUR
}
