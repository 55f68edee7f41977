//! Booking repository.
//!
//! Reads go straight to the pool. Writes are exposed only as `*_tx`
//! helpers so that every booking mutation happens inside the caller's
//! availability transaction (see `services::booking`).

use chrono::{NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::HotelResult;
use crate::models::{Booking, BookingStatus};

/// Fields for a new booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Booking account.
    pub user_id: i64,
    /// Room to reserve.
    pub room_id: i64,
    /// Arrival date.
    pub check_in_date: NaiveDate,
    /// Departure date.
    pub check_out_date: NaiveDate,
    /// Contact email.
    pub email: Option<String>,
    /// Initial status.
    pub status: BookingStatus,
}

/// Field changes for an existing booking; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    /// New arrival date.
    pub check_in_date: Option<NaiveDate>,
    /// New departure date.
    pub check_out_date: Option<NaiveDate>,
    /// New status.
    pub status: Option<BookingStatus>,
}

/// Read access to the `bookings` table.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Finds a booking by id.
    pub async fn find_by_id(&self, id: i64) -> HotelResult<Option<Booking>> {
        let mut conn = self.pool.acquire().await?;
        find_by_id_tx(&mut conn, id).await
    }

    /// Bookings newest first, optionally restricted to one status.
    pub async fn find_all(&self, status: Option<BookingStatus>) -> HotelResult<Vec<Booking>> {
        let bookings = match status {
            Some(status) => {
                sqlx::query_as::<_, Booking>(
                    "SELECT * FROM bookings WHERE status = ? ORDER BY created_at DESC, id DESC",
                )
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC, id DESC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(bookings)
    }

    /// Bookings made by one account, newest first.
    pub async fn find_by_user(&self, user_id: i64) -> HotelResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }
}

/// Finds a booking on an existing connection or transaction.
pub(crate) async fn find_by_id_tx(conn: &mut SqliteConnection, id: i64) -> HotelResult<Option<Booking>> {
    let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(booking)
}

/// Takes the write lock on behalf of booking `id`; `false` if it does not exist.
///
/// SQLite has no `SELECT ... FOR UPDATE`. A deferred transaction that reads
/// first fails with `SQLITE_BUSY` when it later tries to write after another
/// writer committed, so mutating paths start with this no-op update.
pub(crate) async fn lock_tx(conn: &mut SqliteConnection, id: i64) -> HotelResult<bool> {
    let result = sqlx::query("UPDATE bookings SET id = id WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Inserts a booking row.
pub(crate) async fn insert_tx(conn: &mut SqliteConnection, data: &NewBooking) -> HotelResult<Booking> {
    let now = Utc::now();
    let booking = sqlx::query_as::<_, Booking>(
        "INSERT INTO bookings (user_id, room_id, check_in_date, check_out_date, email, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(data.user_id)
    .bind(data.room_id)
    .bind(data.check_in_date)
    .bind(data.check_out_date)
    .bind(&data.email)
    .bind(data.status)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(booking)
}

/// Writes new dates and status for a booking, returning the updated row.
pub(crate) async fn update_tx(
    conn: &mut SqliteConnection,
    id: i64,
    check_in_date: NaiveDate,
    check_out_date: NaiveDate,
    status: BookingStatus,
) -> HotelResult<Booking> {
    let booking = sqlx::query_as::<_, Booking>(
        "UPDATE bookings SET check_in_date = ?, check_out_date = ?, status = ?, updated_at = ?
         WHERE id = ?
         RETURNING *",
    )
    .bind(check_in_date)
    .bind(check_out_date)
    .bind(status)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(booking)
}
