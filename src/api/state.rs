//! Shared application state for the HTTP API.
//!
//! Everything here is built once in `main` from the loaded configuration
//! and the open database, then cloned into each request handler.

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::HotelConfig;
use crate::db::Database;
use crate::services::{BookingManager, PayrollService, StaffService};

/// Shared application state.
///
/// Contains the storage handle, the bearer token service and the
/// multi-entity services built on top of the storage handle.
#[derive(Clone)]
pub struct AppState {
    config: Arc<HotelConfig>,
    db: Database,
    tokens: Arc<TokenService>,
    bookings: BookingManager,
    payroll: PayrollService,
    staff: StaffService,
}

impl AppState {
    /// Creates the state from the loaded configuration and an open database.
    pub fn new(config: HotelConfig, db: Database) -> Self {
        let tokens = TokenService::new(&config.auth);
        Self {
            bookings: BookingManager::new(db.clone()),
            payroll: PayrollService::new(db.clone()),
            staff: StaffService::new(db.clone()),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
            db,
        }
    }

    /// The loaded configuration.
    pub fn config(&self) -> &HotelConfig {
        &self.config
    }

    /// The storage handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Bearer token issue and verification.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// The booking availability transaction.
    pub fn bookings(&self) -> &BookingManager {
        &self.bookings
    }

    /// Payroll generation and records.
    pub fn payroll(&self) -> &PayrollService {
        &self.payroll
    }

    /// Staff onboarding and removal.
    pub fn staff(&self) -> &StaffService {
        &self.staff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
