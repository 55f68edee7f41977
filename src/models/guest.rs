//! Guest profile model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::types::Json;

/// A guest profile kept for loyalty and service preferences.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Guest {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Free-form preferences, e.g. `{"pillow": "firm"}`.
    pub preferences: Json<Value>,
    /// Past stays.
    pub stay_history: Json<Vec<Value>>,
    /// Accumulated loyalty points.
    pub loyalty_points: i64,
    /// Dietary requirements.
    pub dietary_needs: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}
