//! Configuration types for the hotel back office.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section has
//! defaults so a minimal file only needs `auth.jwt_secret`.

use serde::{Deserialize, Serialize};

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct HotelConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Relational store settings.
    pub database: DatabaseConfig,
    /// Token and password hashing settings.
    pub auth: AuthConfig,
    /// Expiry sweep settings.
    pub housekeeping: HousekeepingConfig,
    /// Outbound mail settings.
    pub notifications: NotificationConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. "0.0.0.0:8080".
    pub bind: String,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Relational store settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. "sqlite://hotel.db".
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://hotel.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Token and password hashing settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for bearer tokens.
    pub jwt_secret: String,
    /// Token lifetime in hours.
    pub token_ttl_hours: i64,
    /// bcrypt work factor.
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: 8,
            bcrypt_cost: 10,
        }
    }
}

/// Housekeeping expiry sweep settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HousekeepingConfig {
    /// Seconds between sweeps.
    pub sweep_interval_secs: u64,
    /// Hours a manual status override shields a task from the sweep.
    pub override_grace_hours: i64,
}

impl Default for HousekeepingConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 60,
            override_grace_hours: 24,
        }
    }
}

/// Which mail transport the outbox dispatcher uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MailTransport {
    /// Write messages to the log only.
    #[default]
    Log,
    /// POST messages to an HTTP mail relay.
    Relay,
}

/// Outbound mail settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Transport used by the dispatcher.
    pub transport: MailTransport,
    /// Relay endpoint when `transport` is `relay`.
    pub relay_url: Option<String>,
    /// Bearer key for the relay.
    pub relay_api_key: Option<String>,
    /// Sender address on outgoing mail.
    pub from_address: String,
    /// Seconds between outbox polls.
    pub poll_interval_secs: u64,
    /// Rows fetched per poll.
    pub batch_size: i64,
    /// Delivery attempts before a message is marked failed.
    pub max_attempts: i64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            transport: MailTransport::Log,
            relay_url: None,
            relay_api_key: None,
            from_address: "reservations@hotel.local".to_string(),
            poll_interval_secs: 5,
            batch_size: 20,
            max_attempts: 3,
        }
    }
}
