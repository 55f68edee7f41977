//! Payroll generation.
//!
//! Turns an employee's completed housekeeping tasks for a month into a
//! persisted salary record. The arithmetic lives in [`crate::calculation`];
//! this module resolves the rate policy, selects the tasks and stores the
//! result.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::calculation::{SalaryBreakdown, compute_salary};
use crate::db::{Database, NewSalaryRecord, f64_to_decimal};
use crate::error::{HotelError, HotelResult};
use crate::models::{PaymentStatus, SalaryRecord, SalaryRecordView, TaskHours, User};

/// Earliest payroll year accepted.
pub const MIN_YEAR: i32 = 2000;
/// Latest payroll year accepted.
pub const MAX_YEAR: i32 = 2100;

/// A freshly generated record with its figures at full precision.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSalary {
    /// The stored record.
    #[serde(flatten)]
    pub record: SalaryRecord,
    /// The computation behind it.
    pub breakdown: SalaryBreakdown,
}

/// Payroll operations.
#[derive(Debug, Clone)]
pub struct PayrollService {
    db: Database,
}

impl PayrollService {
    /// Creates a service over `db`.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Computes and stores the salary for one employee and month.
    ///
    /// The hourly rate is the override when given, otherwise the
    /// employee's stored rate. The base salary is the override when it is
    /// nonzero, otherwise the stored base salary, otherwise zero.
    pub async fn generate(
        &self,
        employee_id: i64,
        month: u32,
        year: i32,
        hourly_rate: Option<Decimal>,
        base_salary: Option<Decimal>,
    ) -> HotelResult<GeneratedSalary> {
        let (from, until) = month_bounds(month, year)?;

        let employee = self
            .db
            .users()
            .find_by_id(employee_id)
            .await?
            .ok_or(HotelError::EmployeeNotFound { employee_id })?;
        let rate = resolve_rate(&employee, hourly_rate)?;
        let base = resolve_base_salary(&employee, base_salary)?;

        let tasks = self
            .db
            .tasks()
            .find_completed_for_employee(employee_id, from, until)
            .await?;
        let hours: Vec<TaskHours> = tasks
            .iter()
            .map(|task| TaskHours {
                task_id: task.id,
                hours: task.worked_hours(),
            })
            .collect();

        let breakdown = compute_salary(hours, rate, base);
        let record = self
            .db
            .salaries()
            .create(NewSalaryRecord {
                employee_id,
                month,
                year,
                breakdown: breakdown.clone(),
            })
            .await?;

        info!(
            employee_id,
            month,
            year,
            record_id = record.id,
            tasks = breakdown.completed_tasks.len(),
            total_hours = %breakdown.total_hours,
            total_salary = %breakdown.total_salary,
            "Salary generated"
        );
        Ok(GeneratedSalary { record, breakdown })
    }

    /// The most recent record for an employee and month.
    pub async fn get_record(&self, employee_id: i64, month: u32, year: i32) -> HotelResult<SalaryRecordView> {
        month_bounds(month, year)?;
        self.db
            .salaries()
            .find_for_employee(employee_id, month, year)
            .await?
            .ok_or_else(|| {
                HotelError::not_found("Salary record", format!("employee {employee_id} for {month}/{year}"))
            })
    }

    /// Every record for a month, ordered by employee.
    pub async fn list_for_period(&self, month: u32, year: i32) -> HotelResult<Vec<SalaryRecordView>> {
        month_bounds(month, year)?;
        self.db.salaries().find_for_period(month, year).await
    }

    /// Sets a record's payment status. Any status may follow any other.
    pub async fn update_status(&self, record_id: i64, status: &str) -> HotelResult<SalaryRecordView> {
        let status: PaymentStatus = status.parse()?;
        let record = self.db.salaries().set_status(record_id, status).await?;
        info!(record_id, status = %status, "Salary payment status updated");
        Ok(record)
    }
}

/// First day of the month and first day of the next.
fn month_bounds(month: u32, year: i32) -> HotelResult<(NaiveDate, NaiveDate)> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(HotelError::validation(
            "year",
            format!("year must be between {MIN_YEAR} and {MAX_YEAR}"),
        ));
    }
    let from = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| HotelError::validation("month", "month must be between 1 and 12"))?;
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let until = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| HotelError::validation("month", "month must be between 1 and 12"))?;
    Ok((from, until))
}

fn resolve_rate(employee: &User, hourly_rate: Option<Decimal>) -> HotelResult<Decimal> {
    let rate = match (hourly_rate, employee.hourly_rate) {
        (Some(rate), _) => rate,
        (None, Some(stored)) => f64_to_decimal(stored, "hourly_rate")?,
        (None, None) => {
            return Err(HotelError::validation(
                "hourly_rate",
                format!("employee {} has no hourly rate; provide one", employee.id),
            ));
        }
    };
    if rate <= Decimal::ZERO {
        return Err(HotelError::validation("hourly_rate", "hourly rate must be positive"));
    }
    Ok(rate)
}

fn resolve_base_salary(employee: &User, base_salary: Option<Decimal>) -> HotelResult<Decimal> {
    let base = match base_salary.filter(|b| !b.is_zero()) {
        Some(base) => base,
        None => match employee.base_salary {
            Some(stored) => f64_to_decimal(stored, "base_salary")?,
            None => Decimal::ZERO,
        },
    };
    if base < Decimal::ZERO {
        return Err(HotelError::validation("base_salary", "base salary cannot be negative"));
    }
    Ok(base)
}
