//! Booking and room availability.
//!
//! A room is bookable only while its status is `Available`. Creating a
//! booking and flipping the room to `Unavailable` happen in one
//! transaction, as do cancelling a booking and releasing its room. The
//! claim itself is a conditional update, so of two requests racing for
//! the same room exactly one succeeds.
//!
//! Each successful change queues an invoice email in the same
//! transaction. Delivery happens later in the dispatcher job and cannot
//! fail the request.

use chrono::NaiveDate;
use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::db::{BookingChanges, Database, NewBooking, bookings, outbox, rooms};
use crate::error::{HotelError, HotelResult};
use crate::models::{Booking, BookingStatus, NewOutboxMessage};
use crate::notify::invoice;

/// Booking lifecycle operations.
#[derive(Debug, Clone)]
pub struct BookingManager {
    db: Database,
}

impl BookingManager {
    /// Creates a manager over `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Books an `Available` room and marks it `Unavailable`.
    ///
    /// Fails with [`HotelError::RoomNotFound`] for an unknown room and
    /// [`HotelError::RoomUnavailable`] when the room is in any other
    /// status; in both cases nothing is written.
    pub async fn create(&self, request: NewBooking) -> HotelResult<Booking> {
        validate_dates(request.check_in_date, request.check_out_date)?;

        let mut tx = self.db.pool().begin().await?;

        // The claim is the first statement so the transaction holds the
        // write lock before it reads anything.
        if !rooms::claim_available_tx(&mut tx, request.room_id).await? {
            let room = rooms::find_by_id_tx(&mut tx, request.room_id)
                .await?
                .ok_or(HotelError::RoomNotFound {
                    room_id: request.room_id,
                })?;
            return Err(HotelError::RoomUnavailable {
                room_id: room.id,
                status: room.status.to_string(),
            });
        }

        let booking = bookings::insert_tx(&mut tx, &request).await?;
        let room = rooms::find_by_id_tx(&mut tx, request.room_id)
            .await?
            .ok_or(HotelError::RoomNotFound {
                room_id: request.room_id,
            })?;

        enqueue(&mut tx, &booking, invoice::confirmation(&booking, &room)).await?;
        tx.commit().await?;

        info!(
            booking_id = booking.id,
            room_id = room.id,
            status = %booking.status,
            "Booking created"
        );
        Ok(booking)
    }

    /// Moves a booking to `status`.
    ///
    /// The status string is parsed before anything is read, so an unknown
    /// value never touches storage. Cancelling frees the room in the same
    /// transaction; completing a stay leaves the room status as it is.
    pub async fn update_status(&self, booking_id: i64, status: &str) -> HotelResult<Booking> {
        let next: BookingStatus = status.parse()?;

        let mut tx = self.db.pool().begin().await?;
        let current = locked_booking(&mut tx, booking_id).await?;

        let booking = apply_change(
            &mut tx,
            current,
            BookingChanges {
                status: Some(next),
                ..Default::default()
            },
        )
        .await?;
        tx.commit().await?;

        info!(booking_id, status = %booking.status, "Booking status updated");
        Ok(booking)
    }

    /// Updates dates and/or status.
    ///
    /// Date changes are not checked against other bookings; the room's
    /// status is the only availability gate. A status change follows the
    /// same rules as [`BookingManager::update_status`].
    pub async fn update(&self, booking_id: i64, changes: BookingChanges) -> HotelResult<Booking> {
        let mut tx = self.db.pool().begin().await?;
        let current = locked_booking(&mut tx, booking_id).await?;

        let booking = apply_change(&mut tx, current, changes).await?;
        tx.commit().await?;

        info!(booking_id, "Booking updated");
        Ok(booking)
    }

    /// One booking by id.
    pub async fn get(&self, booking_id: i64) -> HotelResult<Booking> {
        self.db
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or(HotelError::BookingNotFound { booking_id })
    }

    /// Bookings newest first, optionally filtered by status.
    pub async fn list(&self, status: Option<&str>) -> HotelResult<Vec<Booking>> {
        let status = status.map(str::parse::<BookingStatus>).transpose()?;
        self.db.bookings().find_all(status).await
    }
}

/// Locks then reads a booking inside a transaction.
async fn locked_booking(conn: &mut SqliteConnection, booking_id: i64) -> HotelResult<Booking> {
    if !bookings::lock_tx(conn, booking_id).await? {
        return Err(HotelError::BookingNotFound { booking_id });
    }
    bookings::find_by_id_tx(conn, booking_id)
        .await?
        .ok_or(HotelError::BookingNotFound { booking_id })
}

async fn apply_change(conn: &mut SqliteConnection, current: Booking, changes: BookingChanges) -> HotelResult<Booking> {
    let next = changes.status.unwrap_or(current.status);
    if !current.status.can_transition_to(next) {
        return Err(HotelError::conflict(format!(
            "Booking {} cannot move from {} to {}",
            current.id, current.status, next
        )));
    }

    let check_in = changes.check_in_date.unwrap_or(current.check_in_date);
    let check_out = changes.check_out_date.unwrap_or(current.check_out_date);
    validate_dates(check_in, check_out)?;

    if next == current.status && check_in == current.check_in_date && check_out == current.check_out_date {
        return Ok(current);
    }

    let booking = bookings::update_tx(conn, current.id, check_in, check_out, next).await?;

    let cancelled_now = next == BookingStatus::Cancelled && current.status != BookingStatus::Cancelled;
    if cancelled_now {
        rooms::release_tx(conn, booking.room_id).await?;
        info!(booking_id = booking.id, room_id = booking.room_id, "Room released after cancellation");
    }

    if let Some(room) = rooms::find_by_id_tx(conn, booking.room_id).await? {
        enqueue(conn, &booking, invoice::status_update(&booking, &room)).await?;
    }
    Ok(booking)
}

async fn enqueue(conn: &mut SqliteConnection, booking: &Booking, message: Option<NewOutboxMessage>) -> HotelResult<()> {
    match message {
        Some(message) => {
            outbox::enqueue_tx(conn, &message).await?;
        }
        None => warn!(booking_id = booking.id, "Booking has no contact email, skipping invoice"),
    }
    Ok(())
}

fn validate_dates(check_in: NaiveDate, check_out: NaiveDate) -> HotelResult<()> {
    if check_out <= check_in {
        return Err(HotelError::validation(
            "check_out_date",
            "check-out must be after check-in",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::fixtures::{date, seed_room, seed_user};
    use crate::models::{Role, RoomStatus};

    fn request(user_id: i64, room_id: i64) -> NewBooking {
        NewBooking {
            user_id,
            room_id,
            check_in_date: date(2025, 6, 1),
            check_out_date: date(2025, 6, 4),
            email: Some("guest@example.com".to_string()),
            status: BookingStatus::Confirmed,
        }
    }

    async fn setup() -> (Database, BookingManager, i64, i64) {
        let db = Database::in_memory().await.unwrap();
        let guest = seed_user(&db, "guest1", Role::Guest).await;
        let room = seed_room(&db, "101").await;
        let manager = BookingManager::new(db.clone());
        (db, manager, guest.id, room.id)
    }

    /// A WAL database file with a real connection pool, so transactions
    /// from different tasks actually overlap.
    async fn pooled_database() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("hotel.db").display()),
            max_connections: 8,
        };
        let db = Database::connect(&config).await.unwrap();
        (dir, db)
    }

    async fn room_status(db: &Database, room_id: i64) -> RoomStatus {
        db.rooms().find_by_id(room_id).await.unwrap().unwrap().status
    }

    #[tokio::test]
    async fn test_create_claims_room_and_queues_invoice() {
        let (db, manager, user_id, room_id) = setup().await;

        let booking = manager.create(request(user_id, room_id)).await.unwrap();

        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(room_status(&db, room_id).await, RoomStatus::Unavailable);
        let queued = db.outbox().find_by_booking(booking.id).await.unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].subject, "Booking Confirmation - Invoice");
    }

    #[tokio::test]
    async fn test_concurrent_creates_book_room_once() {
        let (db, manager, user_id, room_id) = setup().await;

        let (first, second) = tokio::join!(
            manager.create(request(user_id, room_id)),
            manager.create(request(user_id, room_id)),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(HotelError::RoomUnavailable { .. })))
        );
        assert_eq!(db.bookings().find_all(None).await.unwrap().len(), 1);
        assert_eq!(room_status(&db, room_id).await, RoomStatus::Unavailable);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_creates_on_pooled_database_fail_loser_as_unavailable() {
        let (_dir, db) = pooled_database().await;
        let guest = seed_user(&db, "racer", Role::Guest).await;
        let manager = BookingManager::new(db.clone());

        for round in 0..10 {
            let room = seed_room(&db, &format!("R{round}")).await;
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let manager = manager.clone();
                    let req = request(guest.id, room.id);
                    tokio::spawn(async move { manager.create(req).await })
                })
                .collect();

            let mut outcomes = Vec::new();
            for handle in handles {
                outcomes.push(handle.await.unwrap());
            }

            assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1, "round {round}: {outcomes:?}");
            assert!(
                outcomes
                    .iter()
                    .filter_map(|r| r.as_ref().err())
                    .all(|e| matches!(e, HotelError::RoomUnavailable { .. })),
                "round {round}: {outcomes:?}"
            );
            assert_eq!(room_status(&db, room.id).await, RoomStatus::Unavailable);
        }

        assert_eq!(db.bookings().find_all(None).await.unwrap().len(), 10);
        db.close().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_cancels_on_pooled_database_both_succeed() {
        let (_dir, db) = pooled_database().await;
        let guest = seed_user(&db, "canceller", Role::Guest).await;
        let room = seed_room(&db, "301").await;
        let manager = BookingManager::new(db.clone());
        let booking = manager.create(request(guest.id, room.id)).await.unwrap();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.update_status(booking.id, "cancelled").await })
            })
            .collect();
        for handle in handles {
            let cancelled = handle.await.unwrap().unwrap();
            assert_eq!(cancelled.status, BookingStatus::Cancelled);
        }

        assert_eq!(room_status(&db, room.id).await, RoomStatus::Available);
        db.close().await;
    }

    #[tokio::test]
    async fn test_unavailable_room_rejected_without_writes() {
        let (db, manager, user_id, room_id) = setup().await;
        db.rooms().set_status(room_id, RoomStatus::Maintenance).await.unwrap();

        let err = manager.create(request(user_id, room_id)).await.unwrap_err();

        assert!(matches!(err, HotelError::RoomUnavailable { ref status, .. } if status == "Maintenance"));
        assert!(db.bookings().find_all(None).await.unwrap().is_empty());
        assert_eq!(room_status(&db, room_id).await, RoomStatus::Maintenance);
    }

    #[tokio::test]
    async fn test_unknown_room_is_not_found() {
        let (_db, manager, user_id, _room_id) = setup().await;
        let err = manager.create(request(user_id, 999)).await.unwrap_err();
        assert!(matches!(err, HotelError::RoomNotFound { room_id: 999 }));
    }

    #[tokio::test]
    async fn test_cancel_releases_room_and_is_idempotent() {
        let (db, manager, user_id, room_id) = setup().await;
        let booking = manager.create(request(user_id, room_id)).await.unwrap();

        let cancelled = manager.update_status(booking.id, "cancelled").await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(room_status(&db, room_id).await, RoomStatus::Available);
        let queued_after_cancel = db.outbox().find_by_booking(booking.id).await.unwrap().len();
        assert_eq!(queued_after_cancel, 2);

        // Someone else books the freed room; a repeated cancel must not free it again.
        let other = manager.create(request(user_id, room_id)).await.unwrap();
        let again = manager.update_status(booking.id, "cancelled").await.unwrap();
        assert_eq!(again.status, BookingStatus::Cancelled);
        assert_eq!(again.updated_at, cancelled.updated_at);
        assert_eq!(manager.get(booking.id).await.unwrap().updated_at, cancelled.updated_at);
        assert_eq!(
            db.outbox().find_by_booking(booking.id).await.unwrap().len(),
            queued_after_cancel
        );
        assert_eq!(room_status(&db, room_id).await, RoomStatus::Unavailable);
        assert_eq!(manager.get(other.id).await.unwrap().status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_invalid_status_rejected_before_any_write() {
        let (db, manager, user_id, room_id) = setup().await;
        let booking = manager.create(request(user_id, room_id)).await.unwrap();
        let queued_before = db.outbox().find_by_booking(booking.id).await.unwrap().len();

        let err = manager.update_status(booking.id, "archived").await.unwrap_err();

        assert!(matches!(err, HotelError::InvalidStatus { entity: "booking", .. }));
        let stored = manager.get(booking.id).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Confirmed);
        assert_eq!(stored.updated_at, booking.updated_at);
        assert_eq!(db.outbox().find_by_booking(booking.id).await.unwrap().len(), queued_before);
    }

    #[tokio::test]
    async fn test_status_change_on_missing_booking() {
        let (_db, manager, _user_id, _room_id) = setup().await;
        let err = manager.update_status(77, "confirmed").await.unwrap_err();
        assert!(matches!(err, HotelError::BookingNotFound { booking_id: 77 }));
    }

    #[tokio::test]
    async fn test_completed_booking_keeps_room_unavailable() {
        let (db, manager, user_id, room_id) = setup().await;
        let booking = manager.create(request(user_id, room_id)).await.unwrap();

        manager.update_status(booking.id, "completed").await.unwrap();

        assert_eq!(room_status(&db, room_id).await, RoomStatus::Unavailable);
    }

    #[tokio::test]
    async fn test_terminal_booking_cannot_be_reopened() {
        let (_db, manager, user_id, room_id) = setup().await;
        let booking = manager.create(request(user_id, room_id)).await.unwrap();
        manager.update_status(booking.id, "cancelled").await.unwrap();

        let err = manager.update_status(booking.id, "confirmed").await.unwrap_err();
        assert!(matches!(err, HotelError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_changes_dates_and_queues_invoice() {
        let (db, manager, user_id, room_id) = setup().await;
        let booking = manager.create(request(user_id, room_id)).await.unwrap();

        let updated = manager
            .update(
                booking.id,
                BookingChanges {
                    check_out_date: Some(date(2025, 6, 6)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.check_out_date, date(2025, 6, 6));
        assert_eq!(updated.nights(), 5);
        let queued = db.outbox().find_by_booking(booking.id).await.unwrap();
        assert_eq!(queued.len(), 2);
        assert_eq!(queued[1].subject, "Booking Confirmed - Updated Invoice");
    }

    #[tokio::test]
    async fn test_booking_without_email_queues_nothing() {
        let (db, manager, user_id, room_id) = setup().await;
        let mut req = request(user_id, room_id);
        req.email = None;

        let booking = manager.create(req).await.unwrap();

        assert!(db.outbox().find_by_booking(booking.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (db, manager, user_id, room_id) = setup().await;
        let second_room = seed_room(&db, "102").await;
        let first = manager.create(request(user_id, room_id)).await.unwrap();
        manager.create(request(user_id, second_room.id)).await.unwrap();
        manager.update_status(first.id, "cancelled").await.unwrap();

        let cancelled = manager.list(Some("cancelled")).await.unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, first.id);
        assert_eq!(manager.list(None).await.unwrap().len(), 2);
        assert!(manager.list(Some("archived")).await.is_err());
    }
}
