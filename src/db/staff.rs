//! Staff profile repository.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use crate::error::{HotelError, HotelResult};
use crate::models::{Staff, StaffProfile};

const PROFILE_SELECT: &str = "SELECT s.*, u.username, u.role, u.email, u.hourly_rate, u.base_salary
     FROM staff s JOIN users u ON u.id = s.user_id";

/// Fields for a new staff profile.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewStaff {
    /// Account the profile belongs to.
    pub user_id: i64,
    /// Full legal name.
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    /// Department.
    pub department: Option<String>,
    /// Job title.
    pub position: Option<String>,
    /// Contact phone.
    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,
    /// Hire date.
    pub hire_date: Option<NaiveDate>,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct StaffUpdate {
    /// New full name.
    #[validate(length(min = 1, max = 120))]
    pub full_name: Option<String>,
    /// New department.
    pub department: Option<String>,
    /// New job title.
    pub position: Option<String>,
    /// New phone.
    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,
    /// New hire date.
    pub hire_date: Option<NaiveDate>,
}

/// Access to the `staff` table.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    /// Creates a repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All profiles with account fields, ordered by name.
    pub async fn find_all(&self) -> HotelResult<Vec<StaffProfile>> {
        let sql = format!("{PROFILE_SELECT} ORDER BY s.full_name");
        let profiles = sqlx::query_as::<_, StaffProfile>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    /// One profile by staff id.
    pub async fn find_by_id(&self, id: i64) -> HotelResult<Option<StaffProfile>> {
        let sql = format!("{PROFILE_SELECT} WHERE s.id = ?");
        let profile = sqlx::query_as::<_, StaffProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    /// Returns true if the account has a staff profile.
    pub async fn exists_for_user(&self, user_id: i64) -> HotelResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM staff WHERE user_id = ?)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Applies a partial update.
    pub async fn update(&self, id: i64, data: StaffUpdate) -> HotelResult<StaffProfile> {
        let result = sqlx::query(
            "UPDATE staff SET
                full_name = COALESCE(?, full_name),
                department = COALESCE(?, department),
                position = COALESCE(?, position),
                phone = COALESCE(?, phone),
                hire_date = COALESCE(?, hire_date),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(data.full_name)
        .bind(data.department)
        .bind(data.position)
        .bind(data.phone)
        .bind(data.hire_date)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HotelError::not_found("Staff", id));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| HotelError::not_found("Staff", id))
    }
}

/// Inserts a profile on an existing transaction; one profile per account.
pub(crate) async fn create_tx(conn: &mut SqliteConnection, data: &NewStaff) -> HotelResult<Staff> {
    let now = Utc::now();
    let staff = sqlx::query_as::<_, Staff>(
        "INSERT INTO staff (user_id, full_name, department, position, phone, hire_date, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(data.user_id)
    .bind(&data.full_name)
    .bind(&data.department)
    .bind(&data.position)
    .bind(&data.phone)
    .bind(data.hire_date)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| HotelError::from_unique_violation(e, "Staff profile already exists for this user"))?;
    Ok(staff)
}

/// Finds a bare profile row on an existing transaction.
pub(crate) async fn find_row_tx(conn: &mut SqliteConnection, id: i64) -> HotelResult<Option<Staff>> {
    let staff = sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(staff)
}

/// Deletes a profile row on an existing transaction.
pub(crate) async fn delete_tx(conn: &mut SqliteConnection, id: i64) -> HotelResult<()> {
    sqlx::query("DELETE FROM staff WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
