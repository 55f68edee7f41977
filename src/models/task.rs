//! Housekeeping task model.
//!
//! Tasks are scheduled against a room and assigned to a staff member.
//! Completed tasks feed payroll; overdue tasks are demoted by the expiry
//! sweep unless a staff member recently set their status by hand.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::worked_hours;
use crate::error::HotelError;

/// Progress state of a housekeeping task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum TaskStatus {
    /// Scheduled, not started.
    Pending,
    /// Being worked on.
    InProgress,
    /// Finished; counts toward payroll.
    Complete,
    /// End time passed without completion.
    Incomplete,
    /// Called off.
    Cancelled,
}

impl TaskStatus {
    /// The label stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Complete => "Complete",
            TaskStatus::Incomplete => "Incomplete",
            TaskStatus::Cancelled => "Cancelled",
        }
    }

    /// Terminal tasks are never demoted by the expiry sweep.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Complete | TaskStatus::Cancelled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = HotelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "InProgress" => Ok(TaskStatus::InProgress),
            "Complete" => Ok(TaskStatus::Complete),
            "Incomplete" => Ok(TaskStatus::Incomplete),
            "Cancelled" => Ok(TaskStatus::Cancelled),
            other => Err(HotelError::InvalidStatus {
                entity: "task",
                value: other.to_string(),
            }),
        }
    }
}

/// A scheduled housekeeping task.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HousekeepingTask {
    /// Primary key.
    pub id: i64,
    /// Room the task is for.
    pub room_id: i64,
    /// Short label, e.g. "Deep clean".
    pub task_name: String,
    /// Free-text details.
    pub description: Option<String>,
    /// Current progress.
    pub task_status: TaskStatus,
    /// Day the task is scheduled on; payroll groups by this date.
    pub scheduled_date: NaiveDate,
    /// Planned start.
    pub start_time: DateTime<Utc>,
    /// Planned end.
    pub end_time: DateTime<Utc>,
    /// Assigned staff account.
    pub assigned_to: i64,
    /// Set when a person changed the status by hand.
    pub manual_status_override: bool,
    /// When the manual change happened.
    pub last_manual_update: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl HousekeepingTask {
    /// Hours between start and end, fractional and unrounded.
    pub fn worked_hours(&self) -> Decimal {
        worked_hours(self.start_time, self.end_time)
    }

    /// Returns true if the expiry sweep would demote this task at `now`.
    ///
    /// A task qualifies when its end time has passed, it is not terminal,
    /// and it either carries no manual override or the override is older
    /// than `grace`.
    pub fn is_sweep_eligible(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        if self.end_time >= now || self.task_status.is_terminal() {
            return false;
        }
        if !self.manual_status_override {
            return true;
        }
        match self.last_manual_update {
            Some(at) => now - at > grace,
            None => true,
        }
    }
}

/// A task joined with display names for listings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskListing {
    /// The task row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: HousekeepingTask,
    /// Username of the assignee.
    pub assigned_to_name: Option<String>,
    /// Door number of the room.
    pub room_number: Option<String>,
}
