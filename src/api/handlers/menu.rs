//! Menu endpoints. Listing is public.

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::post,
};
use tracing::info;

use crate::api::request::{IdRequest, IdentifiedUpdate, ValidJson};
use crate::api::response::{ApiResponse, ApiResult};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::db::{MenuFilter, MenuItemUpdate, NewMenuItem};
use crate::models::MenuItem;

use super::MANAGEMENT;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/menu/items", post(create).get(list))
        .route("/menu/items/update", post(update))
        .route("/menu/items/delete", post(delete))
}

async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<NewMenuItem>,
) -> ApiResult<MenuItem> {
    caller.require_any(MANAGEMENT)?;
    let item = state.db().menu().create(request).await?;
    info!(menu_item_id = item.id, name = %item.name, "Menu item created");
    Ok(ApiResponse::created("Menu item created successfully", item))
}

async fn list(
    State(state): State<AppState>,
    filter: Result<Query<MenuFilter>, QueryRejection>,
) -> ApiResult<Vec<MenuItem>> {
    let Query(filter) = filter?;
    let items = state.db().menu().find_all(&filter).await?;
    Ok(ApiResponse::ok("Menu items retrieved successfully", items))
}

async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<IdentifiedUpdate<MenuItemUpdate>>,
) -> ApiResult<MenuItem> {
    caller.require_any(MANAGEMENT)?;
    let item = state.db().menu().update(request.id, request.changes).await?;
    Ok(ApiResponse::ok("Menu item updated successfully", item))
}

async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<IdRequest>,
) -> ApiResult<()> {
    caller.require_any(MANAGEMENT)?;
    state.db().menu().delete(request.id).await?;
    info!(menu_item_id = request.id, "Menu item deleted");
    Ok(ApiResponse::message("Menu item deleted successfully"))
}
