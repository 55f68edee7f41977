//! HTTP request handlers for the hotel back-office API.
//!
//! Each area exposes a `router()` with paths relative to `/api`; they are
//! merged here and wrapped in the CORS and trace layers.

mod accounts;
mod bookings;
mod guests;
mod housekeeping;
mod menu;
mod orders;
mod payroll;
mod rooms;
mod staff;

use axum::{Json, Router, http::HeaderValue, routing::get};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::models::Role;

use super::state::AppState;

/// Administrators only.
const ADMIN: &[Role] = &[Role::Admin];
/// Administrators and managers.
const MANAGEMENT: &[Role] = &[Role::Admin, Role::Manager];

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(accounts::router())
        .merge(staff::router())
        .merge(rooms::router())
        .merge(bookings::router())
        .merge(housekeeping::router())
        .merge(payroll::router())
        .merge(guests::router())
        .merge(menu::router())
        .merge(orders::router());

    let cors = cors_layer(&state.config().server.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::permissive().allow_origin(AllowOrigin::list(allowed))
}

/// Handler for GET /health.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
