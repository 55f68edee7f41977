//! Error types for the hotel operations back office.
//!
//! Every layer (config, repositories, services, jobs) returns [`HotelError`];
//! the HTTP layer maps each variant onto a status code and response envelope.

use thiserror::Error;

/// The main error type for the hotel operations back office.
///
/// # Example
///
/// ```
/// use hotel_ops::error::HotelError;
///
/// let error = HotelError::BookingNotFound { booking_id: 42 };
/// assert_eq!(error.to_string(), "Booking not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum HotelError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Request input failed validation before any storage access.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A status value outside the entity's enumeration.
    #[error("Invalid {entity} status '{value}'")]
    InvalidStatus {
        /// The entity whose status was being set (booking, task, payment, ...).
        entity: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The referenced room does not exist.
    #[error("Room not found: {room_id}")]
    RoomNotFound {
        /// The missing room.
        room_id: i64,
    },

    /// The room is not in a bookable state.
    #[error("Room {room_id} is not available for booking (status: {status})")]
    RoomUnavailable {
        /// The room that was requested.
        room_id: i64,
        /// The status the room was found in.
        status: String,
    },

    /// The referenced booking does not exist.
    #[error("Booking not found: {booking_id}")]
    BookingNotFound {
        /// The missing booking.
        booking_id: i64,
    },

    /// The referenced employee does not exist.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The missing employee.
        employee_id: i64,
    },

    /// Any other entity lookup that came back empty.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Entity name, e.g. "Task".
        entity: &'static str,
        /// The key that was looked up.
        key: String,
    },

    /// The request clashes with existing state (duplicate name, illegal transition).
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },

    /// Missing, malformed or expired credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Why authentication failed.
        message: String,
    },

    /// Authenticated, but the role may not perform this action.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Why access was denied.
        message: String,
    },

    /// Underlying database failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure at startup.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Password hashing or verification failed.
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// The underlying failure.
        message: String,
    },

    /// Token signing failed.
    #[error("Token error: {message}")]
    Token {
        /// The underlying failure.
        message: String,
    },

    /// Outbound mail could not be delivered.
    #[error("Notification error: {message}")]
    Notification {
        /// The underlying failure.
        message: String,
    },
}

impl HotelError {
    /// Shorthand for a [`HotelError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`HotelError::NotFound`].
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Shorthand for a [`HotelError::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Shorthand for a [`HotelError::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Shorthand for a [`HotelError::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Converts a unique-constraint violation into a [`HotelError::Conflict`],
    /// leaving every other database error untouched.
    pub fn from_unique_violation(err: sqlx::Error, message: impl Into<String>) -> Self {
        let is_unique = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if is_unique {
            Self::conflict(message)
        } else {
            Self::Database(err)
        }
    }
}

/// A type alias for Results that return HotelError.
pub type HotelResult<T> = Result<T, HotelError>;
