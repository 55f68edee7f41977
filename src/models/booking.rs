//! Booking model and its lifecycle.
//!
//! ```text
//! pending ──► confirmed ──► completed
//!    │            │
//!    └────────────┴──► cancelled
//! ```
//!
//! `cancelled` and `completed` are terminal. Re-applying the current status
//! is accepted as a no-op so that repeated cancellations are idempotent.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HotelError;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created, awaiting confirmation.
    Pending,
    /// Confirmed by staff or payment.
    Confirmed,
    /// Cancelled; the room has been released.
    Cancelled,
    /// Stay finished.
    Completed,
}

impl BookingStatus {
    /// The lowercase label stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    /// Returns true if moving from `self` to `next` is allowed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hotel_ops::models::BookingStatus;
    ///
    /// assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
    /// assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Completed));
    /// assert!(BookingStatus::Cancelled.can_transition_to(BookingStatus::Cancelled));
    /// assert!(!BookingStatus::Cancelled.can_transition_to(BookingStatus::Confirmed));
    /// assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::Completed));
    /// ```
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) | (Confirmed, Completed)
        )
    }

    /// Human-facing label with a leading capital, used in email subjects.
    pub fn title(self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = HotelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(HotelError::InvalidStatus {
                entity: "booking",
                value: other.to_string(),
            }),
        }
    }
}

/// A reservation of one room for a date range.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Booking {
    /// Primary key.
    pub id: i64,
    /// Booking account; cleared if the account is deleted.
    pub user_id: Option<i64>,
    /// Reserved room.
    pub room_id: i64,
    /// Arrival date.
    pub check_in_date: NaiveDate,
    /// Departure date.
    pub check_out_date: NaiveDate,
    /// Contact email for confirmations.
    pub email: Option<String>,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Number of nights between check-in and check-out (at least one).
    pub fn nights(&self) -> i64 {
        (self.check_out_date - self.check_in_date).num_days().max(1)
    }
}
