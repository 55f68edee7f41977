//! Outbox dispatcher.
//!
//! Polls the notification outbox and hands pending messages to the
//! configured [`Mailer`]. A failed delivery is recorded on the row and
//! retried on later polls until the attempt limit marks it `failed`.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::db::OutboxRepository;
use crate::error::HotelResult;
use crate::models::OutboxStatus;
use crate::notify::Mailer;

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Messages delivered.
    pub sent: usize,
    /// Messages that failed and will be retried.
    pub retrying: usize,
    /// Messages that failed for the last time.
    pub failed: usize,
}

/// Outbox delivery worker.
pub struct NotificationDispatcher {
    outbox: OutboxRepository,
    mailer: Arc<dyn Mailer>,
    poll_interval: Duration,
    batch_size: i64,
    max_attempts: i64,
    shutdown: CancellationToken,
}

impl NotificationDispatcher {
    /// Creates a dispatcher.
    pub fn new(
        outbox: OutboxRepository,
        mailer: Arc<dyn Mailer>,
        poll_interval: Duration,
        batch_size: i64,
        max_attempts: i64,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            outbox,
            mailer,
            poll_interval,
            batch_size,
            max_attempts,
            shutdown,
        }
    }

    /// Polls until the shutdown token is cancelled.
    pub async fn run(self) {
        info!(
            poll_secs = self.poll_interval.as_secs(),
            max_attempts = self.max_attempts,
            "Notification dispatcher started"
        );
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {
                    if let Err(e) = self.dispatch_once().await {
                        error!(error = %e, "Notification dispatch pass failed");
                    }
                }
                _ = self.shutdown.cancelled() => {
                    info!("Notification dispatcher received shutdown signal");
                    return;
                }
            }
        }
    }

    /// Sends one batch of pending messages.
    pub async fn dispatch_once(&self) -> HotelResult<DispatchReport> {
        let pending = self.outbox.fetch_pending(self.batch_size, self.max_attempts).await?;
        let mut report = DispatchReport::default();

        for message in pending {
            match self.mailer.send(&message).await {
                Ok(()) => {
                    self.outbox.mark_sent(message.id).await?;
                    report.sent += 1;
                }
                Err(e) => {
                    let reason = e.to_string();
                    let status = self
                        .outbox
                        .mark_failed_attempt(message.id, &reason, self.max_attempts)
                        .await?;
                    if status == OutboxStatus::Failed {
                        error!(outbox_id = message.id, to = %message.recipient, error = %reason, "Giving up on notification");
                        report.failed += 1;
                    } else {
                        warn!(outbox_id = message.id, error = %reason, "Notification delivery failed, will retry");
                        report.retrying += 1;
                    }
                }
            }
        }

        if report != DispatchReport::default() {
            info!(sent = report.sent, retrying = report.retrying, failed = report.failed, "Notification batch processed");
        }
        Ok(report)
    }
}
