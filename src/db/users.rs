//! User account repository.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{HotelError, HotelResult};
use crate::models::{Role, RoleCount, User};

/// Fields for a new account. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// bcrypt hash.
    pub password_hash: String,
    /// Access role.
    pub role: Role,
    /// Contact email.
    pub email: Option<String>,
    /// Default hourly rate.
    pub hourly_rate: Option<f64>,
    /// Default monthly base salary.
    pub base_salary: Option<f64>,
}

/// Partial account update; `None` leaves a column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New login name.
    pub username: Option<String>,
    /// New role.
    pub role: Option<Role>,
    /// New email.
    pub email: Option<String>,
    /// New hourly rate.
    pub hourly_rate: Option<f64>,
    /// New base salary.
    pub base_salary: Option<f64>,
}

/// Access to the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts an account; a taken username is a conflict.
    pub async fn create(&self, data: NewUser) -> HotelResult<User> {
        let mut conn = self.pool.acquire().await?;
        create_tx(&mut conn, data).await
    }

    /// Finds an account by id.
    pub async fn find_by_id(&self, id: i64) -> HotelResult<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        find_by_id_tx(&mut conn, id).await
    }

    /// Finds an account by username.
    pub async fn find_by_username(&self, username: &str) -> HotelResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// All accounts, ordered by id.
    pub async fn find_all(&self) -> HotelResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Accounts holding `role`, ordered by username.
    pub async fn find_by_role(&self, role: Role) -> HotelResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = ? ORDER BY username")
            .bind(role)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Account count per role.
    pub async fn count_by_role(&self) -> HotelResult<Vec<RoleCount>> {
        let counts = sqlx::query_as::<_, RoleCount>(
            "SELECT role, COUNT(*) AS count FROM users GROUP BY role ORDER BY role",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    /// Applies a partial update.
    pub async fn update(&self, id: i64, data: UserUpdate) -> HotelResult<User> {
        let result = sqlx::query(
            "UPDATE users SET
                username = COALESCE(?, username),
                role = COALESCE(?, role),
                email = COALESCE(?, email),
                hourly_rate = COALESCE(?, hourly_rate),
                base_salary = COALESCE(?, base_salary),
                updated_at = ?
             WHERE id = ?",
        )
        .bind(data.username)
        .bind(data.role)
        .bind(data.email)
        .bind(data.hourly_rate)
        .bind(data.base_salary)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| HotelError::from_unique_violation(e, "Username already exists"))?;

        if result.rows_affected() == 0 {
            return Err(HotelError::not_found("User", id));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| HotelError::not_found("User", id))
    }

    /// Replaces the password hash.
    pub async fn set_password_hash(&self, id: i64, password_hash: &str) -> HotelResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(HotelError::not_found("User", id));
        }
        Ok(())
    }

    /// Deletes an account.
    pub async fn delete(&self, id: i64) -> HotelResult<()> {
        let mut conn = self.pool.acquire().await?;
        delete_tx(&mut conn, id).await
    }
}

/// Inserts an account on an existing connection or transaction.
pub(crate) async fn create_tx(conn: &mut SqliteConnection, data: NewUser) -> HotelResult<User> {
    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password_hash, role, email, hourly_rate, base_salary, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING *",
    )
    .bind(&data.username)
    .bind(&data.password_hash)
    .bind(data.role)
    .bind(&data.email)
    .bind(data.hourly_rate)
    .bind(data.base_salary)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        HotelError::from_unique_violation(e, format!("Username '{}' already exists", data.username))
    })?;
    Ok(user)
}

/// Finds an account on an existing connection or transaction.
pub(crate) async fn find_by_id_tx(conn: &mut SqliteConnection, id: i64) -> HotelResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(user)
}

/// Sets the role on an existing connection or transaction.
pub(crate) async fn set_role_tx(conn: &mut SqliteConnection, id: i64, role: Role) -> HotelResult<()> {
    sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
        .bind(role)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Writes pay-rate defaults on an existing transaction; `None` keeps a value.
pub(crate) async fn set_pay_tx(
    conn: &mut SqliteConnection,
    id: i64,
    hourly_rate: Option<f64>,
    base_salary: Option<f64>,
) -> HotelResult<()> {
    sqlx::query(
        "UPDATE users SET
            hourly_rate = COALESCE(?, hourly_rate),
            base_salary = COALESCE(?, base_salary),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(hourly_rate)
    .bind(base_salary)
    .bind(Utc::now())
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Deletes an account on an existing connection or transaction.
pub(crate) async fn delete_tx(conn: &mut SqliteConnection, id: i64) -> HotelResult<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(HotelError::not_found("User", id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            role,
            email: Some(format!("{username}@hotel.test")),
            hourly_rate: Some(20.0),
            base_salary: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_username() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.users();

        let created = repo.create(new_user("alice", Role::Staff)).await.unwrap();
        let found = repo.find_by_username("alice").await.unwrap().unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.role, Role::Staff);
        assert_eq!(found.hourly_rate, Some(20.0));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.users();
        repo.create(new_user("bob", Role::Guest)).await.unwrap();

        let err = repo.create(new_user("bob", Role::Staff)).await.unwrap_err();
        assert!(matches!(err, HotelError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_columns() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.users();
        let user = repo.create(new_user("carol", Role::Staff)).await.unwrap();

        let updated = repo
            .update(
                user.id,
                UserUpdate {
                    hourly_rate: Some(25.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.hourly_rate, Some(25.5));
        assert_eq!(updated.username, "carol");
        assert_eq!(updated.role, Role::Staff);
    }

    #[tokio::test]
    async fn test_count_by_role() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.users();
        repo.create(new_user("a", Role::Staff)).await.unwrap();
        repo.create(new_user("b", Role::Staff)).await.unwrap();
        repo.create(new_user("c", Role::Admin)).await.unwrap();

        let counts = repo.count_by_role().await.unwrap();
        assert!(counts.contains(&RoleCount { role: Role::Staff, count: 2 }));
        assert!(counts.contains(&RoleCount { role: Role::Admin, count: 1 }));
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_not_found() {
        let db = Database::in_memory().await.unwrap();
        let err = db.users().delete(99).await.unwrap_err();
        assert!(matches!(err, HotelError::NotFound { entity: "User", .. }));
    }
}
