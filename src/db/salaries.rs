//! Salary record repository.

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;

use crate::calculation::SalaryBreakdown;
use crate::error::{HotelError, HotelResult};
use crate::models::{PaymentStatus, SalaryRecord, SalaryRecordView};

use super::decimal_to_f64;

const VIEW_SELECT: &str = "SELECT s.*, u.username, u.email,
            u.hourly_rate AS default_hourly_rate, u.base_salary AS default_base_salary
     FROM salary_records s JOIN users u ON u.id = s.employee_id";

/// A computed salary ready to persist.
#[derive(Debug, Clone)]
pub struct NewSalaryRecord {
    /// Employee (user) id.
    pub employee_id: i64,
    /// Period month.
    pub month: u32,
    /// Period year.
    pub year: i32,
    /// Computed figures.
    pub breakdown: SalaryBreakdown,
}

/// Access to the `salary_records` table.
#[derive(Debug, Clone)]
pub struct SalaryRepository {
    pool: SqlitePool,
}

impl SalaryRepository {
    /// Creates a repository over `pool`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persists a record with payment status `Pending`.
    pub async fn create(&self, data: NewSalaryRecord) -> HotelResult<SalaryRecord> {
        let b = &data.breakdown;
        let now = Utc::now();
        let record = sqlx::query_as::<_, SalaryRecord>(
            "INSERT INTO salary_records (
                employee_id, month, year, total_hours, regular_hours, overtime_hours,
                regular_pay, overtime_pay, total_salary, base_salary, applied_hourly_rate,
                completed_tasks, payment_status, created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(data.employee_id)
        .bind(data.month)
        .bind(data.year)
        .bind(decimal_to_f64(b.total_hours))
        .bind(decimal_to_f64(b.regular_hours))
        .bind(decimal_to_f64(b.overtime_hours))
        .bind(decimal_to_f64(b.regular_pay))
        .bind(decimal_to_f64(b.overtime_pay))
        .bind(decimal_to_f64(b.total_salary))
        .bind(decimal_to_f64(b.base_salary))
        .bind(decimal_to_f64(b.hourly_rate))
        .bind(Json(&b.completed_tasks))
        .bind(PaymentStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    /// Finds a record by id with employee fields.
    pub async fn find_by_id(&self, id: i64) -> HotelResult<Option<SalaryRecordView>> {
        let sql = format!("{VIEW_SELECT} WHERE s.id = ?");
        let record = sqlx::query_as::<_, SalaryRecordView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// The most recent record for an employee and period.
    pub async fn find_for_employee(
        &self,
        employee_id: i64,
        month: u32,
        year: i32,
    ) -> HotelResult<Option<SalaryRecordView>> {
        let sql = format!(
            "{VIEW_SELECT} WHERE s.employee_id = ? AND s.month = ? AND s.year = ?
             ORDER BY s.id DESC LIMIT 1"
        );
        let record = sqlx::query_as::<_, SalaryRecordView>(&sql)
            .bind(employee_id)
            .bind(month)
            .bind(year)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// All records for a period, ordered by employee.
    pub async fn find_for_period(&self, month: u32, year: i32) -> HotelResult<Vec<SalaryRecordView>> {
        let sql = format!("{VIEW_SELECT} WHERE s.month = ? AND s.year = ? ORDER BY s.employee_id, s.id");
        let records = sqlx::query_as::<_, SalaryRecordView>(&sql)
            .bind(month)
            .bind(year)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Sets the payment status; any status may follow any other.
    pub async fn set_status(&self, id: i64, status: PaymentStatus) -> HotelResult<SalaryRecordView> {
        let result = sqlx::query("UPDATE salary_records SET payment_status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(HotelError::not_found("Salary record", id));
        }
        self.find_by_id(id)
            .await?
            .ok_or_else(|| HotelError::not_found("Salary record", id))
    }
}
