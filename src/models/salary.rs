//! Salary record model.
//!
//! A salary record is derived once per employee and period by payroll
//! generation and afterwards only its payment status changes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::error::HotelError;

/// Payment state of a salary record. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum PaymentStatus {
    /// Awaiting payment.
    Pending,
    /// Paid out.
    Paid,
    /// Voided.
    Cancelled,
}

impl PaymentStatus {
    /// The label stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = HotelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Paid" => Ok(PaymentStatus::Paid),
            "Cancelled" => Ok(PaymentStatus::Cancelled),
            other => Err(HotelError::InvalidStatus {
                entity: "payment",
                value: other.to_string(),
            }),
        }
    }
}

/// Hours one completed task contributed to a salary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHours {
    /// The housekeeping task.
    pub task_id: i64,
    /// Worked hours, unrounded.
    pub hours: Decimal,
}

/// A persisted salary record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalaryRecord {
    /// Primary key.
    pub id: i64,
    /// Employee (user) the record is for.
    pub employee_id: i64,
    /// Period month, 1-12.
    pub month: i64,
    /// Period year.
    pub year: i64,
    /// Sum of task hours.
    pub total_hours: f64,
    /// Hours paid at the ordinary rate.
    pub regular_hours: f64,
    /// Hours beyond the monthly threshold.
    pub overtime_hours: f64,
    /// Ordinary pay including base salary.
    pub regular_pay: f64,
    /// Overtime pay.
    pub overtime_pay: f64,
    /// regular_pay + overtime_pay.
    pub total_salary: f64,
    /// Base salary applied.
    pub base_salary: f64,
    /// Hourly rate applied.
    pub applied_hourly_rate: f64,
    /// Contributing tasks.
    pub completed_tasks: Json<Vec<TaskHours>>,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A salary record joined with employee display fields.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalaryRecordView {
    /// The record.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: SalaryRecord,
    /// Employee username.
    pub username: String,
    /// Employee email.
    pub email: Option<String>,
    /// Employee's stored hourly rate.
    pub default_hourly_rate: Option<f64>,
    /// Employee's stored base salary.
    pub default_base_salary: Option<f64>,
}
