//! Operations that span several tables.
//!
//! Each service owns a [`crate::db::Database`] handle and runs its
//! multi-entity writes inside a single transaction.

mod booking;
mod payroll;
mod staff;

pub use booking::BookingManager;
pub use payroll::{GeneratedSalary, MAX_YEAR, MIN_YEAR, PayrollService};
pub use staff::{Onboarding, StaffService};
