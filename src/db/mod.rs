//! Relational storage for the hotel back office.
//!
//! [`Database`] owns the SQLite pool. It is built once at process start,
//! handed to everything that needs storage, and closed at shutdown. Each
//! entity has its own repository; operations spanning several entities
//! run inside one transaction through the `*_tx` helpers the repositories
//! expose.

pub(crate) mod bookings;
#[cfg(test)]
pub(crate) mod fixtures;
mod guests;
mod menu;
mod orders;
pub(crate) mod outbox;
pub(crate) mod rooms;
mod salaries;
pub(crate) mod staff;
mod tasks;
pub(crate) mod users;

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{HotelError, HotelResult};

pub use bookings::{BookingChanges, BookingRepository, NewBooking};
pub use guests::{GuestRepository, GuestUpdate, NewGuest};
pub use menu::{MenuFilter, MenuItemUpdate, MenuRepository, NewMenuItem};
pub use orders::{NewOrder, OrderRepository, OrderUpdate};
pub use outbox::OutboxRepository;
pub use rooms::{NewRoom, RoomRepository, RoomUpdate};
pub use salaries::{NewSalaryRecord, SalaryRepository};
pub use staff::{NewStaff, StaffRepository, StaffUpdate};
pub use tasks::{NewTask, TaskRepository, TaskUpdate};
pub use users::{NewUser, UserRepository, UserUpdate};

/// Owns the SQLite connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if missing) the database at `config.url` with WAL
    /// journaling and foreign keys on, then applies pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> HotelResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;
        info!(url = %config.url, "Database connection established (SQLite WAL)");

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Opens a private in-memory database with the schema applied.
    ///
    /// The pool holds exactly one connection that never expires, since
    /// every SQLite in-memory connection is its own database.
    pub async fn in_memory() -> HotelResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> HotelResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes every pooled connection; pending acquires fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }

    /// Repository for user accounts.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Repository for staff profiles.
    pub fn staff(&self) -> StaffRepository {
        StaffRepository::new(self.pool.clone())
    }

    /// Repository for rooms.
    pub fn rooms(&self) -> RoomRepository {
        RoomRepository::new(self.pool.clone())
    }

    /// Repository for bookings.
    pub fn bookings(&self) -> BookingRepository {
        BookingRepository::new(self.pool.clone())
    }

    /// Repository for housekeeping tasks.
    pub fn tasks(&self) -> TaskRepository {
        TaskRepository::new(self.pool.clone())
    }

    /// Repository for salary records.
    pub fn salaries(&self) -> SalaryRepository {
        SalaryRepository::new(self.pool.clone())
    }

    /// Repository for guest profiles.
    pub fn guests(&self) -> GuestRepository {
        GuestRepository::new(self.pool.clone())
    }

    /// Repository for menu items.
    pub fn menu(&self) -> MenuRepository {
        MenuRepository::new(self.pool.clone())
    }

    /// Repository for room-service orders.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Repository for the notification outbox.
    pub fn outbox(&self) -> OutboxRepository {
        OutboxRepository::new(self.pool.clone())
    }
}

/// Converts a computed amount to the REAL column representation.
pub(crate) fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Converts a REAL column value back into a [`Decimal`] for arithmetic.
pub(crate) fn f64_to_decimal(value: f64, field: &str) -> HotelResult<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| HotelError::validation(field, format!("{} is not a finite amount", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_applies_schema() {
        let db = Database::in_memory().await.unwrap();
        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(db.pool())
                .await
                .unwrap();

        for expected in [
            "bookings",
            "guests",
            "housekeeping_tasks",
            "menu_items",
            "notification_outbox",
            "orders",
            "rooms",
            "salary_records",
            "staff",
            "users",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing table {expected}");
        }
    }

    #[tokio::test]
    async fn test_foreign_keys_are_enforced() {
        let db = Database::in_memory().await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_money_conversions() {
        assert_eq!(decimal_to_f64(Decimal::new(350050, 2)), 3500.5);
        assert_eq!(f64_to_decimal(20.0, "rate").unwrap(), Decimal::from(20));
        assert!(f64_to_decimal(f64::NAN, "rate").is_err());
    }
}
