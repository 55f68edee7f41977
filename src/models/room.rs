//! Room inventory model.
//!
//! [`RoomStatus`] is the single source of truth for whether a room can be
//! booked; only [`RoomStatus::Available`] rooms accept new bookings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;

use crate::error::HotelError;

/// Occupancy / readiness state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum RoomStatus {
    /// Clean and free; the only bookable state.
    Available,
    /// Free but waiting for housekeeping.
    #[serde(rename = "Available Not Cleaned")]
    #[sqlx(rename = "Available Not Cleaned")]
    AvailableNotCleaned,
    /// Occupied by an active booking.
    Unavailable,
    /// Out of service.
    Maintenance,
}

impl RoomStatus {
    /// The label stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Available => "Available",
            RoomStatus::AvailableNotCleaned => "Available Not Cleaned",
            RoomStatus::Unavailable => "Unavailable",
            RoomStatus::Maintenance => "Maintenance",
        }
    }

    /// Returns true if a booking may be created against a room in this state.
    pub fn is_bookable(self) -> bool {
        self == RoomStatus::Available
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = HotelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(RoomStatus::Available),
            "Available Not Cleaned" => Ok(RoomStatus::AvailableNotCleaned),
            "Unavailable" => Ok(RoomStatus::Unavailable),
            "Maintenance" => Ok(RoomStatus::Maintenance),
            other => Err(HotelError::InvalidStatus {
                entity: "room",
                value: other.to_string(),
            }),
        }
    }
}

/// Default `maintenance_status` for new rooms.
pub const DEFAULT_MAINTENANCE_STATUS: &str = "Operational";

/// A room in the inventory.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Room {
    /// Primary key.
    pub id: i64,
    /// Unique door number, e.g. "101".
    pub room_number: String,
    /// Type label, e.g. "Deluxe".
    pub room_type: String,
    /// Current occupancy state.
    pub status: RoomStatus,
    /// Nightly base price.
    pub base_price: f64,
    /// Maximum guests.
    pub capacity: i64,
    /// Tax rate as a percentage of the nightly price.
    pub tax_rate: f64,
    /// Bed configuration.
    pub bed_type: Option<String>,
    /// Amenity labels.
    pub amenities: Json<Vec<String>>,
    /// Floor area description.
    pub room_size: Option<String>,
    /// View description.
    pub view_type: Option<String>,
    /// Floor.
    pub floor_number: Option<i64>,
    /// Free-text description.
    pub description: Option<String>,
    /// Image locations.
    pub image_urls: Json<Vec<String>>,
    /// Marketing category.
    pub room_category: Option<String>,
    /// Maintenance state label.
    pub maintenance_status: String,
    /// Smoking permitted.
    pub is_smoking: bool,
    /// Seasonal pricing rules.
    pub seasonal_pricing: Option<Json<Value>>,
    /// Discount rules.
    pub discount_rules: Option<Json<Value>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
