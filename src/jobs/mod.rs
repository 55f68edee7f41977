//! Background workers.
//!
//! Both workers own a clone of the shutdown token and return from `run`
//! once it is cancelled.

mod expiry_sweep;
mod notification_dispatcher;

pub use expiry_sweep::ExpirySweeper;
pub use notification_dispatcher::{DispatchReport, NotificationDispatcher};
