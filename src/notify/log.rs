use async_trait::async_trait;
use tracing::info;

use crate::error::HotelResult;
use crate::models::OutboxMessage;

use super::Mailer;

/// Writes messages to the log instead of sending them.
#[derive(Debug, Clone)]
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    /// Creates a log transport that reports `from` as the sender.
    pub fn new(from: String) -> Self {
        Self { from }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &OutboxMessage) -> HotelResult<()> {
        info!(
            outbox_id = message.id,
            from = %self.from,
            to = %message.recipient,
            subject = %message.subject,
            "Mail delivered to log transport"
        );
        Ok(())
    }
}
