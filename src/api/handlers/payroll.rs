//! Payroll endpoints.

use axum::{
    Router,
    extract::State,
    routing::{post, put},
};

use crate::api::request::{
    GeneratePayrollRequest, PaymentStatusRequest, PayrollDetailsRequest, PayrollPeriodRequest, ValidJson,
};
use crate::api::response::{ApiResponse, ApiResult};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::error::HotelError;
use crate::models::{Role, SalaryRecordView};
use crate::services::GeneratedSalary;

use super::MANAGEMENT;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/payroll/generate", post(generate))
        .route("/payroll/details", post(details))
        .route("/payroll/monthly", post(monthly))
        .route("/payroll/status", put(set_status))
}

async fn generate(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<GeneratePayrollRequest>,
) -> ApiResult<GeneratedSalary> {
    caller.require_any(MANAGEMENT)?;
    let salary = state
        .payroll()
        .generate(
            request.employee_id,
            request.month,
            request.year,
            request.hourly_rate,
            request.base_salary,
        )
        .await?;
    Ok(ApiResponse::ok("Salary calculated and saved successfully", salary))
}

async fn details(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<PayrollDetailsRequest>,
) -> ApiResult<SalaryRecordView> {
    if !matches!(caller.role, Role::Admin | Role::Manager) && caller.id != request.employee_id {
        return Err(HotelError::forbidden("you may only view your own salary records").into());
    }
    let record = state
        .payroll()
        .get_record(request.employee_id, request.month, request.year)
        .await?;
    Ok(ApiResponse::ok("Salary details retrieved successfully", record))
}

async fn monthly(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<PayrollPeriodRequest>,
) -> ApiResult<Vec<SalaryRecordView>> {
    caller.require_any(MANAGEMENT)?;
    let records = state.payroll().list_for_period(request.month, request.year).await?;
    Ok(ApiResponse::ok("Monthly salaries retrieved successfully", records))
}

async fn set_status(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<PaymentStatusRequest>,
) -> ApiResult<SalaryRecordView> {
    caller.require_any(MANAGEMENT)?;
    let record = state.payroll().update_status(request.record_id, &request.status).await?;
    Ok(ApiResponse::ok("Payment status updated successfully", record))
}
