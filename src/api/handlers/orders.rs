//! Room-service order endpoints.
//!
//! Any signed-in user may place and manage orders; deletion is reserved
//! for management.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use tracing::info;

use crate::api::request::{IdRequest, IdentifiedUpdate, ValidJson};
use crate::api::response::{ApiResponse, ApiResult};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::db::{NewOrder, OrderUpdate};
use crate::error::HotelError;
use crate::models::Order;

use super::MANAGEMENT;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/order/create", post(create))
        .route("/orders", get(list))
        .route("/order/view", post(view))
        .route("/order/update", post(update))
        .route("/order/delete", post(delete))
}

async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<NewOrder>,
) -> ApiResult<Order> {
    let order = state.db().orders().create(caller.id, request).await?;
    info!(order_id = order.id, user_id = caller.id, total = order.total_price, "Order placed");
    Ok(ApiResponse::created("Order created successfully", order))
}

async fn list(State(state): State<AppState>, _caller: AuthUser) -> ApiResult<Vec<Order>> {
    let orders = state.db().orders().find_all().await?;
    Ok(ApiResponse::ok("Orders retrieved successfully", orders))
}

async fn view(
    State(state): State<AppState>,
    _caller: AuthUser,
    ValidJson(request): ValidJson<IdRequest>,
) -> ApiResult<Order> {
    let order = state
        .db()
        .orders()
        .find_by_id(request.id)
        .await?
        .ok_or_else(|| HotelError::not_found("Order", request.id))?;
    Ok(ApiResponse::ok("Order retrieved successfully", order))
}

async fn update(
    State(state): State<AppState>,
    _caller: AuthUser,
    ValidJson(request): ValidJson<IdentifiedUpdate<OrderUpdate>>,
) -> ApiResult<Order> {
    let order = state.db().orders().update(request.id, request.changes).await?;
    info!(order_id = order.id, status = %order.status, "Order updated");
    Ok(ApiResponse::ok("Order updated successfully", order))
}

async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<IdRequest>,
) -> ApiResult<()> {
    caller.require_any(MANAGEMENT)?;
    state.db().orders().delete(request.id).await?;
    Ok(ApiResponse::message("Order deleted successfully"))
}
