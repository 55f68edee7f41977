//! Configuration loading and management for the hotel back office.
//!
//! Settings come from a single YAML file with `HOTEL_*` environment
//! variables layered on top.
//!
//! # Example
//!
//! ```no_run
//! use hotel_ops::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/hotel.yaml").unwrap();
//! println!("Database: {}", loader.config().database.url);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, ENV_BIND, ENV_DATABASE_URL, ENV_JWT_SECRET, ENV_MAIL_RELAY_KEY};
pub use types::{
    AuthConfig, DatabaseConfig, HotelConfig, HousekeepingConfig, MailTransport,
    NotificationConfig, ServerConfig,
};
