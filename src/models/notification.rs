//! Outbox rows for outgoing booking mail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery state of an outbox message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OutboxStatus {
    /// Waiting for the dispatcher.
    Pending,
    /// Delivered to the transport.
    Sent,
    /// Gave up after the configured attempts.
    Failed,
}

/// A message queued in the same transaction as the change it reports.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OutboxMessage {
    /// Primary key.
    pub id: i64,
    /// Booking the message is about.
    pub booking_id: Option<i64>,
    /// Destination address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
    /// Delivery state.
    pub status: OutboxStatus,
    /// Delivery attempts so far.
    pub attempts: i64,
    /// Most recent delivery error.
    pub last_error: Option<String>,
    /// When the message was queued.
    pub created_at: DateTime<Utc>,
    /// When the message was delivered.
    pub sent_at: Option<DateTime<Utc>>,
}

/// A rendered message ready to queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOutboxMessage {
    /// Booking the message is about.
    pub booking_id: Option<i64>,
    /// Destination address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}
