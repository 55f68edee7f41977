use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::error::{HotelError, HotelResult};
use crate::models::OutboxMessage;

use super::Mailer;

#[derive(Serialize)]
struct RelayRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Posts messages as JSON to an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct RelayMailer {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    from: String,
}

impl RelayMailer {
    /// Creates a relay transport posting to `url`.
    pub fn new(url: String, api_key: Option<String>, from: String) -> HotelResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| HotelError::Notification {
                message: format!("failed to build relay client: {e}"),
            })?;
        Ok(Self {
            client,
            url,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, message: &OutboxMessage) -> HotelResult<()> {
        let body = RelayRequest {
            from: &self.from,
            to: &message.recipient,
            subject: &message.subject,
            text: &message.body,
        };
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| HotelError::Notification {
            message: format!("relay request failed: {e}"),
        })?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(HotelError::Notification {
                message: format!("relay responded {status}: {detail}"),
            });
        }

        debug!(outbox_id = message.id, "Mail accepted by relay");
        Ok(())
    }
}
