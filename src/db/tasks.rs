//! Housekeeping task repository.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{HotelError, HotelResult};
use crate::models::{HousekeepingTask, TaskListing, TaskStatus};

const LISTING_SELECT: &str = "SELECT t.*, u.username AS assigned_to_name, r.room_number
     FROM housekeeping_tasks t
     LEFT JOIN users u ON u.id = t.assigned_to
     LEFT JOIN rooms r ON r.id = t.room_id";

/// Fields for a new task. Status starts as `Pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    /// Room the task is for.
    pub room_id: i64,
    /// Short label.
    pub task_name: String,
    /// Free-text details.
    pub description: Option<String>,
    /// Scheduled day.
    pub scheduled_date: NaiveDate,
    /// Planned start.
    pub start_time: DateTime<Utc>,
    /// Planned end; must be after the start.
    pub end_time: DateTime<Utc>,
    /// Assigned staff account.
    pub assigned_to: i64,
}

/// Partial task update; status changes go through
/// [`TaskRepository::set_status_manual`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    /// New room.
    pub room_id: Option<i64>,
    /// New label.
    pub task_name: Option<String>,
    /// New details.
    pub description: Option<String>,
    /// New scheduled day.
    pub scheduled_date: Option<NaiveDate>,
    /// New start.
    pub start_time: Option<DateTime<Utc>>,
    /// New end.
    pub end_time: Option<DateTime<Utc>>,
    /// New assignee.
    pub assigned_to: Option<i64>,
}

fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> HotelResult<()> {
    if end <= start {
        return Err(HotelError::validation("end_time", "must be after start_time"));
    }
    Ok(())
}

/// Access to the `housekeeping_tasks` table.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: SqlitePool,
}

impl TaskRepository {
    /// Creates a repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a task after checking the room and assignee exist.
    pub async fn create(&self, data: NewTask) -> HotelResult<HousekeepingTask> {
        if data.task_name.trim().is_empty() {
            return Err(HotelError::validation("task_name", "must not be empty"));
        }
        validate_window(data.start_time, data.end_time)?;

        let mut conn = self.pool.acquire().await?;
        check_references(&mut conn, data.room_id, data.assigned_to).await?;

        let now = Utc::now();
        let task = sqlx::query_as::<_, HousekeepingTask>(
            "INSERT INTO housekeeping_tasks (
                room_id, task_name, description, task_status, scheduled_date, start_time,
                end_time, assigned_to, manual_status_override, last_manual_update,
                created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, NULL, ?, ?)
             RETURNING *",
        )
        .bind(data.room_id)
        .bind(&data.task_name)
        .bind(&data.description)
        .bind(TaskStatus::Pending)
        .bind(data.scheduled_date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.assigned_to)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;
        Ok(task)
    }

    /// Finds a task by id.
    pub async fn find_by_id(&self, id: i64) -> HotelResult<Option<HousekeepingTask>> {
        let task = sqlx::query_as::<_, HousekeepingTask>("SELECT * FROM housekeeping_tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    /// All tasks with display names, ordered by scheduled date then start.
    pub async fn find_all(&self) -> HotelResult<Vec<TaskListing>> {
        let sql = format!("{LISTING_SELECT} ORDER BY t.scheduled_date, t.start_time");
        let tasks = sqlx::query_as::<_, TaskListing>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    /// Tasks assigned to one account, ordered by scheduled date then start.
    pub async fn find_by_assignee(&self, user_id: i64) -> HotelResult<Vec<TaskListing>> {
        let sql = format!(
            "{LISTING_SELECT} WHERE t.assigned_to = ? ORDER BY t.scheduled_date, t.start_time"
        );
        let tasks = sqlx::query_as::<_, TaskListing>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    /// `Complete` tasks for an employee scheduled in `[from, until)`.
    pub async fn find_completed_for_employee(
        &self,
        employee_id: i64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> HotelResult<Vec<HousekeepingTask>> {
        let tasks = sqlx::query_as::<_, HousekeepingTask>(
            "SELECT * FROM housekeeping_tasks
             WHERE assigned_to = ? AND task_status = ?
               AND scheduled_date >= ? AND scheduled_date < ?
             ORDER BY scheduled_date, start_time, id",
        )
        .bind(employee_id)
        .bind(TaskStatus::Complete)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    /// Applies a partial update, re-checking references and the time window.
    pub async fn update(&self, id: i64, data: TaskUpdate) -> HotelResult<HousekeepingTask> {
        let mut tx = self.pool.begin().await?;
        let current = sqlx::query_as::<_, HousekeepingTask>("SELECT * FROM housekeeping_tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| HotelError::not_found("Task", id))?;

        let room_id = data.room_id.unwrap_or(current.room_id);
        let assigned_to = data.assigned_to.unwrap_or(current.assigned_to);
        let start_time = data.start_time.unwrap_or(current.start_time);
        let end_time = data.end_time.unwrap_or(current.end_time);
        validate_window(start_time, end_time)?;
        if let Some(name) = &data.task_name {
            if name.trim().is_empty() {
                return Err(HotelError::validation("task_name", "must not be empty"));
            }
        }
        check_references(&mut tx, room_id, assigned_to).await?;

        let task = sqlx::query_as::<_, HousekeepingTask>(
            "UPDATE housekeeping_tasks SET
                room_id = ?, task_name = ?, description = ?, scheduled_date = ?,
                start_time = ?, end_time = ?, assigned_to = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(room_id)
        .bind(data.task_name.unwrap_or(current.task_name))
        .bind(data.description.or(current.description))
        .bind(data.scheduled_date.unwrap_or(current.scheduled_date))
        .bind(start_time)
        .bind(end_time)
        .bind(assigned_to)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    /// Sets a status by hand, shielding the task from the expiry sweep for
    /// the grace window. `Incomplete` is reserved for the sweep.
    pub async fn set_status_manual(
        &self,
        id: i64,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> HotelResult<HousekeepingTask> {
        if status == TaskStatus::Incomplete {
            return Err(HotelError::validation(
                "task_status",
                "Incomplete is assigned automatically once a task's end time passes",
            ));
        }
        let task = sqlx::query_as::<_, HousekeepingTask>(
            "UPDATE housekeeping_tasks
             SET task_status = ?, manual_status_override = 1, last_manual_update = ?, updated_at = ?
             WHERE id = ?
             RETURNING *",
        )
        .bind(status)
        .bind(now)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| HotelError::not_found("Task", id))?;
        Ok(task)
    }

    /// Deletes a task.
    pub async fn delete(&self, id: i64) -> HotelResult<()> {
        let result = sqlx::query("DELETE FROM housekeeping_tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(HotelError::not_found("Task", id));
        }
        Ok(())
    }

    /// Demotes overdue, non-terminal tasks to `Incomplete` and clears their
    /// override flag. Tasks overridden by hand within `grace` of `now` are
    /// left alone. Returns the number of tasks demoted.
    pub async fn mark_expired(&self, now: DateTime<Utc>, grace: Duration) -> HotelResult<u64> {
        let result = sqlx::query(
            "UPDATE housekeeping_tasks
             SET task_status = ?, manual_status_override = 0, updated_at = ?
             WHERE end_time < ?
               AND task_status NOT IN (?, ?)
               AND (manual_status_override = 0
                    OR last_manual_update IS NULL
                    OR last_manual_update < ?)",
        )
        .bind(TaskStatus::Incomplete)
        .bind(now)
        .bind(now)
        .bind(TaskStatus::Complete)
        .bind(TaskStatus::Cancelled)
        .bind(now - grace)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

async fn check_references(conn: &mut SqliteConnection, room_id: i64, user_id: i64) -> HotelResult<()> {
    let room_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM rooms WHERE id = ?)")
        .bind(room_id)
        .fetch_one(&mut *conn)
        .await?;
    if !room_exists {
        return Err(HotelError::validation(
            "room_id",
            format!("Invalid room_id: room {} does not exist", room_id),
        ));
    }
    let user_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = ?)")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    if !user_exists {
        return Err(HotelError::validation(
            "assigned_to",
            format!("Invalid assigned_to: user {} does not exist", user_id),
        ));
    }
    Ok(())
}
