//! User account model and role hierarchy.
//!
//! Every person who signs in (administrators, managers, housekeeping
//! staff and guests) is a [`User`]. Staff members additionally carry the
//! pay-rate fields payroll resolves against.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HotelError;

/// Access role carried in the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including account administration.
    Admin,
    /// Runs operations; manages staff accounts.
    Manager,
    /// Housekeeping and service staff.
    Staff,
    /// Hotel guest with self-service booking access.
    Guest,
}

impl Role {
    /// All roles, highest privilege first.
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Staff, Role::Guest];

    /// The lowercase name stored in the database and token.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::Guest => "guest",
        }
    }

    /// Returns true if an account with this role may edit an account
    /// holding `target` and leave it holding `new_role`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hotel_ops::models::Role;
    ///
    /// assert!(Role::Admin.can_manage(Role::Manager, Role::Admin));
    /// assert!(Role::Manager.can_manage(Role::Staff, Role::Staff));
    /// assert!(!Role::Manager.can_manage(Role::Staff, Role::Manager));
    /// assert!(!Role::Staff.can_manage(Role::Staff, Role::Staff));
    /// ```
    pub fn can_manage(self, target: Role, new_role: Role) -> bool {
        match self {
            Role::Admin => true,
            Role::Manager => target == Role::Staff && new_role == Role::Staff,
            Role::Staff | Role::Guest => false,
        }
    }

    /// Returns true if this role needs a staff profile before its
    /// account counts as complete.
    pub fn requires_staff_profile(self) -> bool {
        matches!(self, Role::Manager | Role::Staff)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HotelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            "guest" => Ok(Role::Guest),
            other => Err(HotelError::validation(
                "role",
                format!("'{}' is not one of admin, manager, staff, guest", other),
            )),
        }
    }
}

/// A stored user account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Primary key.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    /// bcrypt hash; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Access role.
    pub role: Role,
    /// Contact email.
    pub email: Option<String>,
    /// Default hourly rate used by payroll.
    pub hourly_rate: Option<f64>,
    /// Default monthly base salary used by payroll.
    pub base_salary: Option<f64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Number of accounts per role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RoleCount {
    /// The role.
    pub role: Role,
    /// How many accounts hold it.
    pub count: i64,
}
