//! Booking endpoints.
//!
//! Guests act only on their own bookings; admins and managers on any.

use axum::{
    Router,
    extract::{Path, Query, State, rejection::PathRejection, rejection::QueryRejection},
    routing::{get, post},
};

use crate::api::request::{
    BookingListQuery, BookingStatusRequest, CreateBookingRequest, UpdateBookingRequest, ValidJson,
};
use crate::api::response::{ApiResponse, ApiResult};
use crate::api::state::AppState;
use crate::auth::AuthUser;
use crate::db::NewBooking;
use crate::error::{HotelError, HotelResult};
use crate::models::{Booking, BookingStatus, Role};

use super::MANAGEMENT;

const BOOKING_ROLES: &[Role] = &[Role::Admin, Role::Manager, Role::Guest];

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/booking/create", post(create))
        .route("/booking/status/change", post(change_status))
        .route("/booking/update", post(update))
        .route("/booking/view/:id", get(view))
        .route("/booking/list", get(list))
}

/// A booking whose account was deleted has no owner and is hidden from guests.
fn ensure_owner(caller: &AuthUser, user_id: Option<i64>) -> HotelResult<()> {
    if caller.role == Role::Guest && user_id != Some(caller.id) {
        return Err(HotelError::forbidden("guests may only manage their own bookings"));
    }
    Ok(())
}

/// Guests must own the booking; the lookup is skipped for other roles.
async fn check_access(state: &AppState, caller: &AuthUser, booking_id: i64) -> HotelResult<()> {
    if caller.role == Role::Guest {
        let booking = state.bookings().get(booking_id).await?;
        ensure_owner(caller, booking.user_id)?;
    }
    Ok(())
}

async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<CreateBookingRequest>,
) -> ApiResult<Booking> {
    caller.require_any(BOOKING_ROLES)?;
    let user_id = request.user_id.unwrap_or(caller.id);
    ensure_owner(&caller, Some(user_id))?;

    let status = match request.status.as_deref() {
        Some(label) => label.parse::<BookingStatus>()?,
        None => BookingStatus::Pending,
    };
    if status.is_terminal() {
        return Err(HotelError::validation("status", "a new booking must be pending or confirmed").into());
    }

    let booking = state
        .bookings()
        .create(NewBooking {
            user_id,
            room_id: request.room_id,
            check_in_date: request.check_in_date,
            check_out_date: request.check_out_date,
            email: request.email,
            status,
        })
        .await?;
    Ok(ApiResponse::created("Booking created successfully", booking))
}

async fn change_status(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<BookingStatusRequest>,
) -> ApiResult<Booking> {
    caller.require_any(BOOKING_ROLES)?;
    // Reject unknown labels before any lookup.
    request.status.parse::<BookingStatus>()?;
    check_access(&state, &caller, request.id).await?;
    let booking = state.bookings().update_status(request.id, &request.status).await?;
    Ok(ApiResponse::ok("Booking status updated successfully", booking))
}

async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(request): ValidJson<UpdateBookingRequest>,
) -> ApiResult<Booking> {
    caller.require_any(BOOKING_ROLES)?;
    let changes = request.changes()?;
    check_access(&state, &caller, request.id).await?;
    let booking = state.bookings().update(request.id, changes).await?;
    Ok(ApiResponse::ok("Booking updated successfully", booking))
}

async fn view(
    State(state): State<AppState>,
    caller: AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Booking> {
    caller.require_any(BOOKING_ROLES)?;
    let Path(id) = id?;
    let booking = state.bookings().get(id).await?;
    ensure_owner(&caller, booking.user_id)?;
    Ok(ApiResponse::ok("Booking retrieved successfully", booking))
}

async fn list(
    State(state): State<AppState>,
    caller: AuthUser,
    query: Result<Query<BookingListQuery>, QueryRejection>,
) -> ApiResult<Vec<Booking>> {
    caller.require_any(MANAGEMENT)?;
    let Query(query) = query?;
    let bookings = state.bookings().list(query.status.as_deref()).await?;
    Ok(ApiResponse::ok("Bookings retrieved successfully", bookings))
}
