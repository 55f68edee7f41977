//! Room inventory repository.
//!
//! Besides plain CRUD this module owns the two room-state writes the
//! booking transaction relies on: [`claim_available_tx`] and
//! [`release_tx`]. Both run on the caller's transaction.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use validator::{Validate, ValidationError};

use crate::error::{HotelError, HotelResult};
use crate::models::{DEFAULT_MAINTENANCE_STATUS, Room, RoomStatus};

fn validate_image_urls(urls: &[String]) -> Result<(), ValidationError> {
    if urls
        .iter()
        .all(|u| u.starts_with("https://") || u.starts_with("http://"))
    {
        Ok(())
    } else {
        Err(ValidationError::new("image_url"))
    }
}

/// Fields for a new room. Status starts as `Available`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRoom {
    /// Unique door number.
    #[validate(length(min = 1, max = 20))]
    pub room_number: String,
    /// Type label.
    #[validate(length(min = 1, max = 50))]
    pub room_type: String,
    /// Nightly base price.
    #[validate(range(exclusive_min = 0.0))]
    pub base_price: f64,
    /// Maximum guests.
    #[validate(range(min = 1, max = 20))]
    pub capacity: i64,
    /// Tax percentage.
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub tax_rate: f64,
    /// Bed configuration.
    pub bed_type: Option<String>,
    /// Amenity labels.
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Floor area description.
    pub room_size: Option<String>,
    /// View description.
    pub view_type: Option<String>,
    /// Floor.
    pub floor_number: Option<i64>,
    /// Free-text description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// Image locations.
    #[serde(default)]
    #[validate(custom(function = "validate_image_urls"))]
    pub image_urls: Vec<String>,
    /// Marketing category.
    pub room_category: Option<String>,
    /// Maintenance label; defaults to "Operational".
    pub maintenance_status: Option<String>,
    /// Smoking permitted.
    #[serde(default)]
    pub is_smoking: bool,
    /// Seasonal pricing rules.
    pub seasonal_pricing: Option<Value>,
    /// Discount rules.
    pub discount_rules: Option<Value>,
}

/// Partial room update; `None` leaves a column unchanged. Status is set
/// through [`RoomRepository::set_status`] only.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RoomUpdate {
    /// New door number.
    #[validate(length(min = 1, max = 20))]
    pub room_number: Option<String>,
    /// New type label.
    #[validate(length(min = 1, max = 50))]
    pub room_type: Option<String>,
    /// New nightly price.
    #[validate(range(exclusive_min = 0.0))]
    pub base_price: Option<f64>,
    /// New capacity.
    #[validate(range(min = 1, max = 20))]
    pub capacity: Option<i64>,
    /// New tax percentage.
    #[validate(range(min = 0.0, max = 100.0))]
    pub tax_rate: Option<f64>,
    /// New bed configuration.
    pub bed_type: Option<String>,
    /// New amenity labels.
    pub amenities: Option<Vec<String>>,
    /// New floor area description.
    pub room_size: Option<String>,
    /// New view description.
    pub view_type: Option<String>,
    /// New floor.
    pub floor_number: Option<i64>,
    /// New description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    /// New image locations.
    #[validate(custom(function = "validate_image_urls"))]
    pub image_urls: Option<Vec<String>>,
    /// New category.
    pub room_category: Option<String>,
    /// New maintenance label.
    pub maintenance_status: Option<String>,
    /// New smoking flag.
    pub is_smoking: Option<bool>,
    /// New seasonal pricing.
    pub seasonal_pricing: Option<Value>,
    /// New discount rules.
    pub discount_rules: Option<Value>,
}

/// Access to the `rooms` table.
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: SqlitePool,
}

impl RoomRepository {
    /// Creates a repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a room with status `Available`.
    pub async fn create(&self, data: NewRoom) -> HotelResult<Room> {
        let now = Utc::now();
        let room = sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (
                room_number, room_type, status, base_price, capacity, tax_rate, bed_type,
                amenities, room_size, view_type, floor_number, description, image_urls,
                room_category, maintenance_status, is_smoking, seasonal_pricing, discount_rules,
                created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&data.room_number)
        .bind(&data.room_type)
        .bind(RoomStatus::Available)
        .bind(data.base_price)
        .bind(data.capacity)
        .bind(data.tax_rate)
        .bind(&data.bed_type)
        .bind(Json(&data.amenities))
        .bind(&data.room_size)
        .bind(&data.view_type)
        .bind(data.floor_number)
        .bind(&data.description)
        .bind(Json(&data.image_urls))
        .bind(&data.room_category)
        .bind(
            data.maintenance_status
                .as_deref()
                .unwrap_or(DEFAULT_MAINTENANCE_STATUS),
        )
        .bind(data.is_smoking)
        .bind(data.seasonal_pricing.as_ref().map(Json))
        .bind(data.discount_rules.as_ref().map(Json))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            HotelError::from_unique_violation(e, format!("Room number '{}' already exists", data.room_number))
        })?;
        Ok(room)
    }

    /// Finds a room by id.
    pub async fn find_by_id(&self, id: i64) -> HotelResult<Option<Room>> {
        let mut conn = self.pool.acquire().await?;
        find_by_id_tx(&mut conn, id).await
    }

    /// All rooms, ordered by room number.
    pub async fn find_all(&self) -> HotelResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY room_number")
            .fetch_all(&self.pool)
            .await?;
        Ok(rooms)
    }

    /// Rooms in `status`, ordered by room number.
    pub async fn find_by_status(&self, status: RoomStatus) -> HotelResult<Vec<Room>> {
        let rooms =
            sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE status = ? ORDER BY room_number")
                .bind(status)
                .fetch_all(&self.pool)
                .await?;
        Ok(rooms)
    }

    /// Applies a partial update.
    pub async fn update(&self, id: i64, data: RoomUpdate) -> HotelResult<Room> {
        let result = sqlx::query(
            "UPDATE rooms SET
                room_number = COALESCE(?, room_number),
                room_type = COALESCE(?, room_type),
                base_price = COALESCE(?, base_price),
                capacity = COALESCE(?, capacity),
                tax_rate = COALESCE(?, tax_rate),
                bed_type = COALESCE(?, bed_type),
                amenities = COALESCE(?, amenities),
                room_size = COALESCE(?, room_size),
                view_type = COALESCE(?, view_type),
                floor_number = COALESCE(?, floor_number),
                description = COALESCE(?, description),
                image_urls = COALESCE(?, image_urls),
                room_category = COALESCE(?, room_category),
                maintenance_status = COALESCE(?, maintenance_status),
                is_smoking = COALESCE(?, is_smoking),
                seasonal_pricing = COALESCE(?, seasonal_pricing),
                discount_rules = COALESCE(?, discount_rules),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(data.room_number)
        .bind(data.room_type)
        .bind(data.base_price)
        .bind(data.capacity)
        .bind(data.tax_rate)
        .bind(data.bed_type)
        .bind(data.amenities.map(Json))
        .bind(data.room_size)
        .bind(data.view_type)
        .bind(data.floor_number)
        .bind(data.description)
        .bind(data.image_urls.map(Json))
        .bind(data.room_category)
        .bind(data.maintenance_status)
        .bind(data.is_smoking)
        .bind(data.seasonal_pricing.map(Json))
        .bind(data.discount_rules.map(Json))
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| HotelError::from_unique_violation(e, "Room number already exists"))?;

        if result.rows_affected() == 0 {
            return Err(HotelError::RoomNotFound { room_id: id });
        }
        self.find_by_id(id)
            .await?
            .ok_or(HotelError::RoomNotFound { room_id: id })
    }

    /// Sets a room's status directly (inventory / housekeeping flips).
    pub async fn set_status(&self, id: i64, status: RoomStatus) -> HotelResult<Room> {
        let mut conn = self.pool.acquire().await?;
        set_status_tx(&mut conn, id, status).await?;
        find_by_id_tx(&mut conn, id)
            .await?
            .ok_or(HotelError::RoomNotFound { room_id: id })
    }

    /// Sets the status of several rooms atomically; any missing id aborts all.
    pub async fn set_status_bulk(&self, ids: &[i64], status: RoomStatus) -> HotelResult<u64> {
        let mut tx = self.pool.begin().await?;
        for &id in ids {
            set_status_tx(&mut tx, id, status).await?;
        }
        tx.commit().await?;
        Ok(ids.len() as u64)
    }

    /// Deletes a room. Rooms referenced by bookings cannot be deleted.
    pub async fn delete(&self, id: i64) -> HotelResult<()> {
        let mut conn = self.pool.acquire().await?;
        delete_tx(&mut conn, id).await
    }

    /// Deletes several rooms atomically; any failure aborts all.
    pub async fn delete_bulk(&self, ids: &[i64]) -> HotelResult<u64> {
        let mut tx = self.pool.begin().await?;
        for &id in ids {
            delete_tx(&mut tx, id).await?;
        }
        tx.commit().await?;
        Ok(ids.len() as u64)
    }
}

/// Finds a room on an existing connection or transaction.
pub(crate) async fn find_by_id_tx(conn: &mut SqliteConnection, id: i64) -> HotelResult<Option<Room>> {
    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(room)
}

/// Moves an `Available` room to `Unavailable`.
///
/// The status check and the write are one conditional statement, so two
/// transactions racing for the same room cannot both succeed. Returns
/// false when the room was not `Available`.
pub(crate) async fn claim_available_tx(conn: &mut SqliteConnection, id: i64) -> HotelResult<bool> {
    let result = sqlx::query("UPDATE rooms SET status = ?, updated_at = ? WHERE id = ? AND status = ?")
        .bind(RoomStatus::Unavailable)
        .bind(Utc::now())
        .bind(id)
        .bind(RoomStatus::Available)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Returns a room to `Available`.
pub(crate) async fn release_tx(conn: &mut SqliteConnection, id: i64) -> HotelResult<()> {
    set_status_tx(conn, id, RoomStatus::Available).await
}

async fn set_status_tx(conn: &mut SqliteConnection, id: i64, status: RoomStatus) -> HotelResult<()> {
    let result = sqlx::query("UPDATE rooms SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(HotelError::RoomNotFound { room_id: id });
    }
    Ok(())
}

async fn delete_tx(conn: &mut SqliteConnection, id: i64) -> HotelResult<()> {
    let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if e
                .as_database_error()
                .is_some_and(|db| db.is_foreign_key_violation())
            {
                HotelError::conflict(format!("Room {} has bookings and cannot be deleted", id))
            } else {
                HotelError::Database(e)
            }
        })?;
    if result.rows_affected() == 0 {
        return Err(HotelError::RoomNotFound { room_id: id });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::db::fixtures::new_room;

    #[tokio::test]
    async fn test_create_defaults_status_and_maintenance() {
        let db = Database::in_memory().await.unwrap();
        let room = db.rooms().create(new_room("101")).await.unwrap();

        assert_eq!(room.status, RoomStatus::Available);
        assert_eq!(room.maintenance_status, "Operational");
        assert_eq!(room.amenities.0, vec!["WiFi".to_string()]);
    }

    #[tokio::test]
    async fn test_duplicate_room_number_is_conflict() {
        let db = Database::in_memory().await.unwrap();
        db.rooms().create(new_room("101")).await.unwrap();
        let err = db.rooms().create(new_room("101")).await.unwrap_err();
        assert!(matches!(err, HotelError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_claim_only_succeeds_once() {
        let db = Database::in_memory().await.unwrap();
        let room = db.rooms().create(new_room("102")).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        assert!(claim_available_tx(&mut conn, room.id).await.unwrap());
        assert!(!claim_available_tx(&mut conn, room.id).await.unwrap());

        release_tx(&mut conn, room.id).await.unwrap();
        assert!(claim_available_tx(&mut conn, room.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_status_filters() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.rooms();
        let a = repo.create(new_room("201")).await.unwrap();
        repo.create(new_room("202")).await.unwrap();
        repo.set_status(a.id, RoomStatus::AvailableNotCleaned).await.unwrap();

        let not_cleaned = repo.find_by_status(RoomStatus::AvailableNotCleaned).await.unwrap();
        assert_eq!(not_cleaned.len(), 1);
        assert_eq!(not_cleaned[0].room_number, "201");
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = Database::in_memory().await.unwrap();
        let room = db.rooms().create(new_room("301")).await.unwrap();

        let updated = db
            .rooms()
            .update(
                room.id,
                RoomUpdate {
                    base_price: Some(199.0),
                    amenities: Some(vec!["WiFi".to_string(), "Minibar".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.base_price, 199.0);
        assert_eq!(updated.amenities.0.len(), 2);
        assert_eq!(updated.room_type, "Deluxe");
    }

    #[tokio::test]
    async fn test_bulk_status_rolls_back_on_missing_room() {
        let db = Database::in_memory().await.unwrap();
        let room = db.rooms().create(new_room("401")).await.unwrap();

        let err = db
            .rooms()
            .set_status_bulk(&[room.id, 999], RoomStatus::Maintenance)
            .await
            .unwrap_err();
        assert!(matches!(err, HotelError::RoomNotFound { room_id: 999 }));

        let reloaded = db.rooms().find_by_id(room.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status, RoomStatus::Available);
    }

    #[test]
    fn test_non_positive_price_fails_validation() {
        let mut room = new_room("501");
        room.base_price = 0.0;
        assert!(room.validate().is_err());
    }

    #[test]
    fn test_image_urls_must_be_http() {
        let mut room = new_room("502");
        room.image_urls = vec!["ftp://images/room.jpg".to_string()];
        assert!(room.validate().is_err());
    }
}
