//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the back
//! office configuration from a YAML file and layering environment
//! overrides on top.

use std::fs;
use std::path::Path;

use crate::error::{HotelError, HotelResult};

use super::types::{HotelConfig, MailTransport};

/// Environment variable overriding `database.url`.
pub const ENV_DATABASE_URL: &str = "HOTEL_DATABASE_URL";
/// Environment variable overriding `auth.jwt_secret`.
pub const ENV_JWT_SECRET: &str = "HOTEL_JWT_SECRET";
/// Environment variable overriding `server.bind`.
pub const ENV_BIND: &str = "HOTEL_BIND";
/// Environment variable overriding `notifications.relay_api_key`.
pub const ENV_MAIL_RELAY_KEY: &str = "HOTEL_MAIL_RELAY_KEY";

/// Loads and provides access to the back office configuration.
///
/// # Example
///
/// ```no_run
/// use hotel_ops::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/hotel.yaml")?;
/// println!("Binding to {}", loader.config().server.bind);
/// # Ok::<(), hotel_ops::error::HotelError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: HotelConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file, then applies
    /// `HOTEL_*` environment overrides and validates the result.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file (e.g., "./config/hotel.yaml")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing
    /// - The file contains invalid YAML
    /// - No JWT secret is configured in the file or the environment
    pub fn load<P: AsRef<Path>>(path: P) -> HotelResult<Self> {
        let config = Self::load_yaml::<HotelConfig>(path.as_ref())?;
        let mut loader = Self { config };
        loader.apply_overrides(|key| std::env::var(key).ok());
        loader.validate()?;
        Ok(loader)
    }

    /// Wraps an already-built configuration, validating it.
    pub fn from_config(config: HotelConfig) -> HotelResult<Self> {
        let loader = Self { config };
        loader.validate()?;
        Ok(loader)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> HotelResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| HotelError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| HotelError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Applies overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.config.database.url = url;
        }
        if let Some(secret) = lookup(ENV_JWT_SECRET) {
            self.config.auth.jwt_secret = secret;
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.config.server.bind = bind;
        }
        if let Some(key) = lookup(ENV_MAIL_RELAY_KEY) {
            self.config.notifications.relay_api_key = Some(key);
        }
    }

    fn validate(&self) -> HotelResult<()> {
        let config = &self.config;
        if config.auth.jwt_secret.trim().is_empty() {
            return Err(HotelError::validation(
                "auth.jwt_secret",
                format!("must be set in the file or via {}", ENV_JWT_SECRET),
            ));
        }
        if config.auth.token_ttl_hours <= 0 {
            return Err(HotelError::validation(
                "auth.token_ttl_hours",
                "must be positive",
            ));
        }
        if config.housekeeping.sweep_interval_secs == 0 {
            return Err(HotelError::validation(
                "housekeeping.sweep_interval_secs",
                "must be positive",
            ));
        }
        if config.notifications.transport == MailTransport::Relay
            && config.notifications.relay_url.is_none()
        {
            return Err(HotelError::validation(
                "notifications.relay_url",
                "required when transport is relay",
            ));
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &HotelConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> HotelConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_minimal_configuration_uses_defaults() {
        let file = write_config("auth:\n  jwt_secret: test-secret\n");
        let mut loader = ConfigLoader {
            config: ConfigLoader::load_yaml(file.path()).unwrap(),
        };
        loader.apply_overrides(|_| None);
        loader.validate().unwrap();

        let config = loader.config();
        assert_eq!(config.auth.token_ttl_hours, 8);
        assert_eq!(config.housekeeping.sweep_interval_secs, 60);
        assert_eq!(config.housekeeping.override_grace_hours, 24);
        assert_eq!(config.notifications.transport, MailTransport::Log);
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/hotel.yaml");
        assert!(matches!(result, Err(HotelError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_invalid_yaml_returns_parse_error() {
        let file = write_config("server: [unclosed\n");
        let result = ConfigLoader::load_yaml::<HotelConfig>(file.path());
        assert!(matches!(result, Err(HotelError::ConfigParseError { .. })));
    }

    #[test]
    fn test_env_overrides_replace_file_values() {
        let mut loader = ConfigLoader {
            config: HotelConfig::default(),
        };
        let env: HashMap<&str, &str> = [
            (ENV_DATABASE_URL, "sqlite::memory:"),
            (ENV_JWT_SECRET, "from-env"),
            (ENV_BIND, "127.0.0.1:9000"),
        ]
        .into_iter()
        .collect();

        loader.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(loader.config().database.url, "sqlite::memory:");
        assert_eq!(loader.config().auth.jwt_secret, "from-env");
        assert_eq!(loader.config().server.bind, "127.0.0.1:9000");
        assert!(loader.config().notifications.relay_api_key.is_none());
    }

    #[test]
    fn test_missing_secret_fails_validation() {
        let result = ConfigLoader::from_config(HotelConfig::default());
        assert!(matches!(
            result,
            Err(HotelError::Validation { ref field, .. }) if field == "auth.jwt_secret"
        ));
    }

    #[test]
    fn test_relay_transport_requires_url() {
        let mut config = HotelConfig::default();
        config.auth.jwt_secret = "secret".to_string();
        config.notifications.transport = MailTransport::Relay;

        let result = ConfigLoader::from_config(config);
        assert!(matches!(result, Err(HotelError::Validation { .. })));
    }
}
