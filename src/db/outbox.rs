//! Notification outbox.
//!
//! Messages are queued with [`enqueue_tx`] inside the transaction that
//! produced them, so a rolled-back booking never sends mail. The
//! dispatcher drains pending rows through [`OutboxRepository`].

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::HotelResult;
use crate::models::{NewOutboxMessage, OutboxMessage, OutboxStatus};

/// Access to the `notification_outbox` table.
#[derive(Debug, Clone)]
pub struct OutboxRepository {
    pool: SqlitePool,
}

impl OutboxRepository {
    /// Creates a repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Oldest pending messages that still have attempts left.
    pub async fn fetch_pending(&self, batch_size: i64, max_attempts: i64) -> HotelResult<Vec<OutboxMessage>> {
        let messages = sqlx::query_as::<_, OutboxMessage>(
            "SELECT * FROM notification_outbox
             WHERE status = ? AND attempts < ?
             ORDER BY id
             LIMIT ?",
        )
        .bind(OutboxStatus::Pending)
        .bind(max_attempts)
        .bind(batch_size)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    /// Every message queued for a booking, oldest first.
    pub async fn find_by_booking(&self, booking_id: i64) -> HotelResult<Vec<OutboxMessage>> {
        let messages = sqlx::query_as::<_, OutboxMessage>(
            "SELECT * FROM notification_outbox WHERE booking_id = ? ORDER BY id",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    /// Records a successful delivery.
    pub async fn mark_sent(&self, id: i64) -> HotelResult<()> {
        sqlx::query(
            "UPDATE notification_outbox SET status = ?, attempts = attempts + 1, last_error = NULL, sent_at = ?
             WHERE id = ?",
        )
        .bind(OutboxStatus::Sent)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Records a failed delivery. The row becomes `failed` once it has
    /// used `max_attempts`; returns the status it was left in.
    pub async fn mark_failed_attempt(&self, id: i64, error: &str, max_attempts: i64) -> HotelResult<OutboxStatus> {
        let status = sqlx::query_scalar::<_, OutboxStatus>(
            "UPDATE notification_outbox SET
                attempts = attempts + 1,
                last_error = ?,
                status = CASE WHEN attempts + 1 >= ? THEN 'failed' ELSE status END
             WHERE id = ?
             RETURNING status",
        )
        .bind(error)
        .bind(max_attempts)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(status)
    }
}

/// Queues a message on the caller's transaction.
pub(crate) async fn enqueue_tx(conn: &mut SqliteConnection, message: &NewOutboxMessage) -> HotelResult<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO notification_outbox (booking_id, recipient, subject, body, status, attempts, created_at)
         VALUES (?, ?, ?, ?, ?, 0, ?)
         RETURNING id",
    )
    .bind(message.booking_id)
    .bind(&message.recipient)
    .bind(&message.subject)
    .bind(&message.body)
    .bind(OutboxStatus::Pending)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}
