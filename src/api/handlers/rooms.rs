//! Room inventory endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use tracing::info;

use crate::api::request::{
    BulkIdsRequest, BulkRoomStatusRequest, IdRequest, RoomStatusRequest, UpdateRoomRequest, ValidJson,
};
use crate::api::response::{ApiResponse, ApiResult};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::db::NewRoom;
use crate::error::HotelError;
use crate::models::{Role, Room, RoomStatus};

use super::{ADMIN, MANAGEMENT};

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/rooms", post(create))
        .route("/rooms/all/list", get(list_all))
        .route("/rooms/availability", get(list_available))
        .route("/rooms/not_cleaned/list", get(list_not_cleaned))
        .route("/rooms/booking/list", get(list_booked))
        .route("/rooms/view", post(view))
        .route("/rooms/update", post(update))
        .route("/rooms/status", post(set_status))
        .route("/rooms/bulk/status", post(bulk_status))
        .route("/rooms/delete", post(delete))
        .route("/rooms/bulk/delete", post(bulk_delete))
}

#[derive(Debug, Serialize)]
struct Affected {
    count: u64,
}

async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<NewRoom>,
) -> ApiResult<Room> {
    caller.require_any(MANAGEMENT)?;
    let room = state.db().rooms().create(request).await?;
    info!(room_id = room.id, room_number = %room.room_number, "Room created");
    Ok(ApiResponse::created("Room created successfully", room))
}

async fn list_all(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Vec<Room>> {
    caller.require_any(MANAGEMENT)?;
    let rooms = state.db().rooms().find_all().await?;
    Ok(ApiResponse::ok("Rooms retrieved successfully", rooms))
}

async fn list_by_status(state: &AppState, status: RoomStatus) -> ApiResult<Vec<Room>> {
    let rooms = state.db().rooms().find_by_status(status).await?;
    Ok(ApiResponse::ok(format!("{} rooms retrieved successfully", status), rooms))
}

async fn list_available(State(state): State<AppState>, _caller: AuthUser) -> ApiResult<Vec<Room>> {
    list_by_status(&state, RoomStatus::Available).await
}

async fn list_not_cleaned(State(state): State<AppState>, caller: AuthUser) -> ApiResult<Vec<Room>> {
    caller.require_any(&[Role::Admin, Role::Manager, Role::Staff])?;
    list_by_status(&state, RoomStatus::AvailableNotCleaned).await
}

async fn list_booked(State(state): State<AppState>, _caller: AuthUser) -> ApiResult<Vec<Room>> {
    list_by_status(&state, RoomStatus::Unavailable).await
}

async fn view(
    State(state): State<AppState>,
    _caller: AuthUser,
    ValidJson(request): ValidJson<IdRequest>,
) -> ApiResult<Room> {
    let room = state
        .db()
        .rooms()
        .find_by_id(request.id)
        .await?
        .ok_or(HotelError::RoomNotFound { room_id: request.id })?;
    Ok(ApiResponse::ok("Room retrieved successfully", room))
}

async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<UpdateRoomRequest>,
) -> ApiResult<Room> {
    caller.require_any(MANAGEMENT)?;
    let room = state.db().rooms().update(request.id, request.changes).await?;
    info!(room_id = room.id, "Room updated");
    Ok(ApiResponse::ok("Room updated successfully", room))
}

async fn set_status(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<RoomStatusRequest>,
) -> ApiResult<Room> {
    caller.require_any(ADMIN)?;
    let status: RoomStatus = request.status.parse()?;
    let room = state.db().rooms().set_status(request.id, status).await?;
    info!(room_id = room.id, status = %room.status, "Room status set");
    Ok(ApiResponse::ok("Room status updated successfully", room))
}

async fn bulk_status(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<BulkRoomStatusRequest>,
) -> ApiResult<Affected> {
    caller.require_any(ADMIN)?;
    let status: RoomStatus = request.status.parse()?;
    let count = state.db().rooms().set_status_bulk(&request.ids, status).await?;
    info!(count, status = %status, "Room statuses set in bulk");
    Ok(ApiResponse::ok("Room statuses updated successfully", Affected { count }))
}

async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<IdRequest>,
) -> ApiResult<()> {
    caller.require_any(MANAGEMENT)?;
    state.db().rooms().delete(request.id).await?;
    info!(room_id = request.id, "Room deleted");
    Ok(ApiResponse::message("Room deleted successfully"))
}

async fn bulk_delete(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<BulkIdsRequest>,
) -> ApiResult<Affected> {
    caller.require_any(MANAGEMENT)?;
    let count = state.db().rooms().delete_bulk(&request.ids).await?;
    info!(count, "Rooms deleted in bulk");
    Ok(ApiResponse::ok("Rooms deleted successfully", Affected { count }))
}
