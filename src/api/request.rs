//! Request types for the hotel back-office API.
//!
//! Bodies are read through [`ValidJson`], which maps JSON rejections onto
//! the error envelope and runs the `validator` rules before a handler sees
//! the value.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::db::{BookingChanges, NewStaff, RoomUpdate, StaffUpdate, TaskUpdate};
use crate::models::Role;
use crate::services::{MAX_YEAR, MIN_YEAR, Onboarding};

use super::response::ApiErrorResponse;

/// JSON body that has passed its validation rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

fn default_guest() -> Role {
    Role::Guest
}

fn default_staff() -> Role {
    Role::Staff
}

/// Body for `POST /register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Login name.
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    /// Plain-text password; complexity is checked separately.
    pub password: String,
    /// Requested role.
    #[serde(default = "default_guest")]
    pub role: Role,
    /// Contact email.
    #[validate(email)]
    pub email: Option<String>,
}

/// Body for `POST /login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login name.
    #[validate(length(min = 1))]
    pub username: String,
    /// Plain-text password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body for `POST /password/change`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Account whose password changes.
    pub user_id: i64,
    /// Replacement password.
    pub new_password: String,
}

/// Body for `POST /users/edit`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditUserRequest {
    /// Account to edit.
    pub id: i64,
    /// New login name.
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    /// New role.
    pub role: Option<Role>,
    /// New email.
    #[validate(email)]
    pub email: Option<String>,
    /// New default hourly rate.
    #[validate(range(exclusive_min = 0.0))]
    pub hourly_rate: Option<f64>,
    /// New default base salary.
    #[validate(range(min = 0.0))]
    pub base_salary: Option<f64>,
}

/// Body carrying only an entity id.
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct IdRequest {
    /// Entity id.
    pub id: i64,
}

/// Body for `POST /staff`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStaffRequest {
    /// Profile fields, including the owning `user_id`.
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: NewStaff,
    /// Role to give the account, manager or staff.
    pub role: Option<Role>,
    /// Default hourly rate stored on the account.
    #[validate(range(exclusive_min = 0.0))]
    pub hourly_rate: Option<f64>,
    /// Default base salary stored on the account.
    #[validate(range(min = 0.0))]
    pub base_salary: Option<f64>,
}

impl From<CreateStaffRequest> for Onboarding {
    fn from(request: CreateStaffRequest) -> Self {
        Onboarding {
            profile: request.profile,
            role: request.role,
            hourly_rate: request.hourly_rate,
            base_salary: request.base_salary,
        }
    }
}

/// Body for `POST /register/staff/full`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterStaffRequest {
    /// Login name.
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    /// Plain-text password.
    pub password: String,
    /// Account role, manager or staff.
    #[serde(default = "default_staff")]
    pub role: Role,
    /// Contact email.
    #[validate(email)]
    pub email: Option<String>,
    /// Default hourly rate.
    #[validate(range(exclusive_min = 0.0))]
    pub hourly_rate: Option<f64>,
    /// Default base salary.
    #[validate(range(min = 0.0))]
    pub base_salary: Option<f64>,
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

impl RegisterStaffRequest {
    /// The profile half of the request. `user_id` is filled in once the
    /// account exists.
    pub fn profile(&self) -> NewStaff {
        NewStaff {
            user_id: 0,
            full_name: self.full_name.clone(),
            department: self.department.clone(),
            position: self.position.clone(),
            phone: self.phone.clone(),
            hire_date: self.hire_date,
        }
    }
}

/// Body for `POST /staff/update/:id`.
pub type UpdateStaffRequest = StaffUpdate;

/// Body for `POST /rooms/update`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    /// Room to update.
    pub id: i64,
    /// Fields to change.
    #[serde(flatten)]
    #[validate(nested)]
    pub changes: RoomUpdate,
}

/// Body for `POST /rooms/status`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoomStatusRequest {
    /// Room to update.
    pub id: i64,
    /// New status label.
    pub status: String,
}

/// Body for `POST /rooms/bulk/status`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkRoomStatusRequest {
    /// Rooms to update.
    #[validate(length(min = 1))]
    pub ids: Vec<i64>,
    /// New status label.
    pub status: String,
}

/// Body for bulk deletes.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkIdsRequest {
    /// Entities to delete.
    #[validate(length(min = 1))]
    pub ids: Vec<i64>,
}

/// Body for `POST /booking/create`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    /// Account the booking is for; defaults to the caller.
    pub user_id: Option<i64>,
    /// Room to reserve.
    pub room_id: i64,
    /// Arrival date.
    pub check_in_date: NaiveDate,
    /// Departure date.
    pub check_out_date: NaiveDate,
    /// Address the invoice is mailed to.
    #[validate(email)]
    pub email: Option<String>,
    /// Initial status label; `pending` when omitted.
    pub status: Option<String>,
}

/// Body for `POST /booking/status/change`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingStatusRequest {
    /// Booking to change.
    pub id: i64,
    /// New status label.
    pub status: String,
}

/// Body for `POST /booking/update`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBookingRequest {
    /// Booking to change.
    pub id: i64,
    /// New arrival date.
    pub check_in_date: Option<NaiveDate>,
    /// New departure date.
    pub check_out_date: Option<NaiveDate>,
    /// New status label.
    pub status: Option<String>,
}

impl UpdateBookingRequest {
    /// Parses the status label and collects the changes.
    pub fn changes(&self) -> crate::error::HotelResult<BookingChanges> {
        Ok(BookingChanges {
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            status: self.status.as_deref().map(str::parse).transpose()?,
        })
    }
}

/// Query for `GET /booking/list`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingListQuery {
    /// Status label to filter by.
    pub status: Option<String>,
}

/// Body for `POST /assigned/task`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignedTasksRequest {
    /// Assignee; defaults to the caller.
    pub assigned_to: Option<i64>,
}

/// Body for `POST /housekeeping/task/update`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// Task to update.
    pub id: i64,
    /// Fields to change.
    #[serde(flatten)]
    pub changes: TaskUpdate,
}

/// Body for `POST /housekeeping/task_status/update`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TaskStatusRequest {
    /// Task to update.
    pub id: i64,
    /// New status label.
    pub status: String,
}

/// Body for `POST /payroll/generate`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GeneratePayrollRequest {
    /// Employee (user) id.
    pub employee_id: i64,
    /// Calendar month, 1 to 12.
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    /// Calendar year.
    #[validate(range(min = MIN_YEAR, max = MAX_YEAR))]
    pub year: i32,
    /// Rate override; must be positive.
    #[validate(custom(function = "positive_amount"))]
    pub hourly_rate: Option<Decimal>,
    /// Base salary override; must not be negative.
    #[validate(custom(function = "non_negative_amount"))]
    pub base_salary: Option<Decimal>,
}

fn positive_amount(value: &Decimal) -> Result<(), validator::ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(validator::ValidationError::new("range").with_message("must be a positive number".into()))
    }
}

fn non_negative_amount(value: &Decimal) -> Result<(), validator::ValidationError> {
    if *value >= Decimal::ZERO {
        Ok(())
    } else {
        Err(validator::ValidationError::new("range").with_message("must not be negative".into()))
    }
}

/// Body for `POST /payroll/details`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PayrollDetailsRequest {
    /// Employee (user) id.
    pub employee_id: i64,
    /// Calendar month, 1 to 12.
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    /// Calendar year.
    #[validate(range(min = MIN_YEAR, max = MAX_YEAR))]
    pub year: i32,
}

/// Body for `POST /payroll/monthly`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PayrollPeriodRequest {
    /// Calendar month, 1 to 12.
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    /// Calendar year.
    #[validate(range(min = MIN_YEAR, max = MAX_YEAR))]
    pub year: i32,
}

/// Body for `PUT /payroll/status`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentStatusRequest {
    /// Salary record to update.
    pub record_id: i64,
    /// New payment status label.
    pub status: String,
}

/// Body for update endpoints that carry the id next to the changed fields.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentifiedUpdate<T> {
    /// Entity to update.
    pub id: i64,
    /// Fields to change.
    #[serde(flatten)]
    pub changes: T,
}

impl<T: Validate> Validate for IdentifiedUpdate<T> {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        self.changes.validate()
    }
}
