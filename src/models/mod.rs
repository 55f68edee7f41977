//! Core data models for the hotel back office.
//!
//! Each entity maps onto one table; status enumerations parse from their
//! wire labels with [`std::str::FromStr`] so invalid values are rejected
//! before any storage access.

mod booking;
mod guest;
mod menu;
mod notification;
mod order;
mod room;
mod salary;
mod staff;
mod task;
mod user;

pub use booking::{Booking, BookingStatus};
pub use guest::Guest;
pub use menu::{DietaryTag, MAX_DESCRIPTION_CHARS, MenuCategory, MenuItem};
pub use notification::{NewOutboxMessage, OutboxMessage, OutboxStatus};
pub use order::{Order, OrderItem, OrderStatus, order_total};
pub use room::{DEFAULT_MAINTENANCE_STATUS, Room, RoomStatus};
pub use salary::{PaymentStatus, SalaryRecord, SalaryRecordView, TaskHours};
pub use staff::{Staff, StaffProfile};
pub use task::{HousekeepingTask, TaskListing, TaskStatus};
pub use user::{Role, RoleCount, User};
