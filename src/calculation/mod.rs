//! Payroll arithmetic for the hotel back office.
//!
//! This module contains the pure calculation functions behind payroll:
//! measuring worked hours on a task, splitting a month's hours at the
//! overtime threshold, and deriving regular, overtime and total pay.
//! Nothing here touches storage.

mod monthly_overtime;
mod salary;
mod worked_hours;

pub use monthly_overtime::{
    HoursSplit, OVERTIME_MULTIPLIER, STANDARD_MONTHLY_HOURS, split_monthly_hours,
};
pub use salary::{SalaryBreakdown, compute_salary};
pub use worked_hours::worked_hours;
