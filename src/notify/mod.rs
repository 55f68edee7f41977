//! Outbound mail.
//!
//! Booking changes never send mail directly: they queue an outbox row
//! (see [`invoice`]) and the dispatcher job hands each row to a [`Mailer`].

pub mod invoice;
mod log;
mod relay;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{MailTransport, NotificationConfig};
use crate::error::{HotelError, HotelResult};
use crate::models::OutboxMessage;

pub use log::LogMailer;
pub use relay::RelayMailer;

/// A mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers one queued message.
    async fn send(&self, message: &OutboxMessage) -> HotelResult<()>;
}

/// Builds the transport selected in configuration.
pub fn build_mailer(config: &NotificationConfig) -> HotelResult<Arc<dyn Mailer>> {
    match config.transport {
        MailTransport::Log => Ok(Arc::new(LogMailer::new(config.from_address.clone()))),
        MailTransport::Relay => {
            let url = config.relay_url.clone().ok_or_else(|| HotelError::Notification {
                message: "relay transport requires notifications.relay_url".to_string(),
            })?;
            let mailer = RelayMailer::new(url, config.relay_api_key.clone(), config.from_address.clone())?;
            Ok(Arc::new(mailer))
        }
    }
}
