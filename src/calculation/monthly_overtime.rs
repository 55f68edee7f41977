//! Monthly overtime split.
//!
//! Hours beyond a fixed monthly threshold are paid as overtime. The
//! threshold is a single policy constant, not configurable per employee.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hours per month paid at the ordinary rate.
pub const STANDARD_MONTHLY_HOURS: Decimal = Decimal::from_parts(160, 0, 0, false, 0);

/// Multiplier applied to the hourly rate for overtime hours (1.5).
pub const OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Split of a month's hours into regular and overtime portions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursSplit {
    /// Hours up to the threshold.
    pub regular_hours: Decimal,
    /// Hours beyond the threshold (can be zero).
    pub overtime_hours: Decimal,
}

/// Splits `total_hours` at `threshold`.
///
/// # Examples
///
/// ```
/// use hotel_ops::calculation::{split_monthly_hours, STANDARD_MONTHLY_HOURS};
/// use rust_decimal::Decimal;
///
/// let split = split_monthly_hours(Decimal::from(161), STANDARD_MONTHLY_HOURS);
/// assert_eq!(split.regular_hours, Decimal::from(160));
/// assert_eq!(split.overtime_hours, Decimal::from(1));
/// ```
pub fn split_monthly_hours(total_hours: Decimal, threshold: Decimal) -> HoursSplit {
    let total_hours = total_hours.max(Decimal::ZERO);
    let regular_hours = total_hours.min(threshold);
    let overtime_hours = (total_hours - threshold).max(Decimal::ZERO);
    HoursSplit {
        regular_hours,
        overtime_hours,
    }
}
