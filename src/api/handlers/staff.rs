//! Staff profile endpoints.

use axum::{
    Router,
    extract::{Path, State, rejection::PathRejection},
    routing::{get, post},
};
use tracing::info;

use crate::api::request::{CreateStaffRequest, RegisterStaffRequest, UpdateStaffRequest, ValidJson};
use crate::api::response::{ApiResponse, ApiResult};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::db::NewUser;
use crate::error::HotelError;
use crate::models::StaffProfile;

use super::accounts::hash_new_password;
use super::{ADMIN, MANAGEMENT};

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/register/staff/full", post(register_full))
        .route("/staff", post(create_profile).get(list))
        .route("/staff/:id", get(view))
        .route("/staff/update/:id", post(update))
        .route("/staff/delete/:id", post(delete))
}

async fn register_full(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<RegisterStaffRequest>,
) -> ApiResult<StaffProfile> {
    caller.require_any(MANAGEMENT)?;
    if !caller.role.can_manage(request.role, request.role) {
        return Err(HotelError::forbidden("Managers can only register staff accounts").into());
    }

    let password_hash = hash_new_password(&state, &request.password).await?;
    let profile = request.profile();
    let account = NewUser {
        username: request.username,
        password_hash,
        role: request.role,
        email: request.email,
        hourly_rate: request.hourly_rate,
        base_salary: request.base_salary,
    };
    let created = state.staff().register_full(account, profile).await?;
    Ok(ApiResponse::created("Staff member registered successfully", created))
}

async fn create_profile(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<CreateStaffRequest>,
) -> ApiResult<StaffProfile> {
    caller.require_any(MANAGEMENT)?;
    if request.role.is_some_and(|role| !caller.role.can_manage(role, role)) {
        return Err(HotelError::forbidden("Managers can only assign the staff role").into());
    }
    let profile = state.staff().onboard(request.into()).await?;
    Ok(ApiResponse::created("Staff profile created successfully", profile))
}

async fn list(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Vec<StaffProfile>> {
    caller.require_any(MANAGEMENT)?;
    let staff = state.db().staff().find_all().await?;
    Ok(ApiResponse::ok("Staff retrieved successfully", staff))
}

async fn view(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StaffProfile> {
    caller.require_any(MANAGEMENT)?;
    let Path(id) = id?;
    let profile = state.staff().profile(id).await?;
    Ok(ApiResponse::ok("Staff retrieved successfully", profile))
}

async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<i64>, PathRejection>,
    ValidJson(changes): ValidJson<UpdateStaffRequest>,
) -> ApiResult<StaffProfile> {
    caller.require_any(MANAGEMENT)?;
    let Path(id) = id?;
    let profile = state.db().staff().update(id, changes).await?;
    info!(staff_id = id, updated_by = caller.id, "Staff profile updated");
    Ok(ApiResponse::ok("Staff profile updated successfully", profile))
}

async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    caller.require_any(ADMIN)?;
    let Path(id) = id?;
    state.staff().remove(id).await?;
    Ok(ApiResponse::message("Staff member and account deleted successfully"))
}
