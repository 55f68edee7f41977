//! Guest profile repository.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::types::Json;
use validator::Validate;

use crate::error::{HotelError, HotelResult};
use crate::models::Guest;

/// Fields for a new guest profile.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewGuest {
    /// Display name.
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Contact email.
    #[validate(email)]
    pub email: Option<String>,
    /// Contact phone.
    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,
    /// Preferences object.
    #[serde(default = "empty_object")]
    pub preferences: Value,
    /// Past stays.
    #[serde(default)]
    pub stay_history: Vec<Value>,
    /// Starting loyalty points.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub loyalty_points: i64,
    /// Dietary requirements.
    pub dietary_needs: Option<String>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// Partial guest update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GuestUpdate {
    /// New name.
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    /// New email.
    #[validate(email)]
    pub email: Option<String>,
    /// New phone.
    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,
    /// Replacement preferences.
    pub preferences: Option<Value>,
    /// Replacement stay history.
    pub stay_history: Option<Vec<Value>>,
    /// New loyalty balance.
    #[validate(range(min = 0))]
    pub loyalty_points: Option<i64>,
    /// New dietary requirements.
    pub dietary_needs: Option<String>,
}

/// Access to the `guests` table.
#[derive(Debug, Clone)]
pub struct GuestRepository {
    pool: SqlitePool,
}

impl GuestRepository {
    /// Creates a repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a guest profile.
    pub async fn create(&self, data: NewGuest) -> HotelResult<Guest> {
        let now = Utc::now();
        let guest = sqlx::query_as::<_, Guest>(
            "INSERT INTO guests (name, email, phone, preferences, stay_history, loyalty_points, dietary_needs, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(Json(&data.preferences))
        .bind(Json(&data.stay_history))
        .bind(data.loyalty_points)
        .bind(&data.dietary_needs)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(guest)
    }

    /// Finds a guest by id.
    pub async fn find_by_id(&self, id: i64) -> HotelResult<Option<Guest>> {
        let guest = sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(guest)
    }

    /// All guests ordered by name.
    pub async fn find_all(&self) -> HotelResult<Vec<Guest>> {
        let guests = sqlx::query_as::<_, Guest>("SELECT * FROM guests ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(guests)
    }

    /// Applies a partial update.
    pub async fn update(&self, id: i64, data: GuestUpdate) -> HotelResult<Guest> {
        let guest = sqlx::query_as::<_, Guest>(
            "UPDATE guests SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                preferences = COALESCE(?, preferences),
                stay_history = COALESCE(?, stay_history),
                loyalty_points = COALESCE(?, loyalty_points),
                dietary_needs = COALESCE(?, dietary_needs),
                updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.preferences.map(Json))
        .bind(data.stay_history.map(Json))
        .bind(data.loyalty_points)
        .bind(data.dietary_needs)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| HotelError::not_found("Guest", id))?;
        Ok(guest)
    }

    /// Deletes a guest profile.
    pub async fn delete(&self, id: i64) -> HotelResult<()> {
        let result = sqlx::query("DELETE FROM guests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(HotelError::not_found("Guest", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use serde_json::json;

    fn new_guest(name: &str) -> NewGuest {
        NewGuest {
            name: name.to_string(),
            email: Some("guest@example.com".to_string()),
            phone: None,
            preferences: json!({"pillow": "firm"}),
            stay_history: Vec::new(),
            loyalty_points: 0,
            dietary_needs: None,
        }
    }

    #[tokio::test]
    async fn test_guests_listed_by_name() {
        let db = Database::in_memory().await.unwrap();
        db.guests().create(new_guest("Zoe")).await.unwrap();
        db.guests().create(new_guest("Adam")).await.unwrap();

        let names: Vec<String> = db
            .guests()
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["Adam", "Zoe"]);
    }

    #[tokio::test]
    async fn test_update_replaces_json_fields() {
        let db = Database::in_memory().await.unwrap();
        let guest = db.guests().create(new_guest("Ann")).await.unwrap();

        let updated = db
            .guests()
            .update(
                guest.id,
                GuestUpdate {
                    loyalty_points: Some(150),
                    stay_history: Some(vec![json!({"room": "101", "nights": 2})]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.loyalty_points, 150);
        assert_eq!(updated.stay_history.0.len(), 1);
        assert_eq!(updated.preferences.0["pillow"], "firm");
    }

    #[tokio::test]
    async fn test_update_missing_guest_is_not_found() {
        let db = Database::in_memory().await.unwrap();
        let err = db.guests().update(5, GuestUpdate::default()).await.unwrap_err();
        assert!(matches!(err, HotelError::NotFound { entity: "Guest", .. }));
    }

    #[test]
    fn test_negative_loyalty_points_fail_validation() {
        let mut guest = new_guest("Neg");
        guest.loyalty_points = -1;
        assert!(guest.validate().is_err());
    }
}
