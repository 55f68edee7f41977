//! Guest profile endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};

use crate::api::request::{IdRequest, IdentifiedUpdate, ValidJson};
use crate::api::response::{ApiResponse, ApiResult};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::db::{GuestUpdate, NewGuest};
use crate::error::HotelError;
use crate::models::Guest;

use super::MANAGEMENT;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/guests/list", get(list))
        .route("/guest/view", post(view))
        .route("/guest/create", post(create))
        .route("/guest/update", post(update))
        .route("/guest/delete", post(delete))
}

async fn list(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Vec<Guest>> {
    caller.require_any(MANAGEMENT)?;
    let guests = state.db().guests().find_all().await?;
    Ok(ApiResponse::ok("Guest profiles retrieved successfully", guests))
}

async fn view(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<IdRequest>,
) -> ApiResult<Guest> {
    caller.require_any(MANAGEMENT)?;
    let guest = state
        .db()
        .guests()
        .find_by_id(request.id)
        .await?
        .ok_or_else(|| HotelError::not_found("Guest", request.id))?;
    Ok(ApiResponse::ok("Guest profile retrieved successfully", guest))
}

async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<NewGuest>,
) -> ApiResult<Guest> {
    caller.require_any(MANAGEMENT)?;
    let guest = state.db().guests().create(request).await?;
    Ok(ApiResponse::created("Guest profile created successfully", guest))
}

async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<IdentifiedUpdate<GuestUpdate>>,
) -> ApiResult<Guest> {
    caller.require_any(MANAGEMENT)?;
    let guest = state.db().guests().update(request.id, request.changes).await?;
    Ok(ApiResponse::ok("Guest profile updated successfully", guest))
}

async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<IdRequest>,
) -> ApiResult<()> {
    caller.require_any(MANAGEMENT)?;
    state.db().guests().delete(request.id).await?;
    Ok(ApiResponse::message("Guest profile deleted successfully"))
}
