//! Staff profile attached to a manager or staff account.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::user::Role;

/// Employment details for a manager or staff account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Staff {
    /// Primary key.
    pub id: i64,
    /// Owning user account.
    pub user_id: i64,
    /// Full legal name.
    pub full_name: String,
    /// Department, e.g. "Housekeeping".
    pub department: Option<String>,
    /// Job title.
    pub position: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Date employment started.
    pub hire_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A staff profile joined with its account fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StaffProfile {
    /// The profile row.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub staff: Staff,
    /// Account login name.
    pub username: String,
    /// Account role.
    pub role: Role,
    /// Account email.
    pub email: Option<String>,
    /// Default hourly rate.
    pub hourly_rate: Option<f64>,
    /// Default monthly base salary.
    pub base_salary: Option<f64>,
}
