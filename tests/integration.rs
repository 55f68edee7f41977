//! End-to-end tests for the hotel back-office API.
//!
//! Each test builds the full router over a private in-memory database and
//! drives it with `tower::ServiceExt::oneshot`, covering:
//! - health and authentication
//! - role enforcement
//! - request rejection mapping
//! - the booking availability transaction
//! - payroll input validation

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use hotel_ops::api::{AppState, create_router};
use hotel_ops::config::{AuthConfig, HotelConfig};
use hotel_ops::db::{Database, NewUser};
use hotel_ops::models::Role;

// =============================================================================
// Test Helpers
// =============================================================================

const ADMIN_PASSWORD: &str = "Adm1n!pass";

async fn test_app() -> Router {
    let db = Database::in_memory().await.unwrap();
    let config = HotelConfig {
        auth: AuthConfig {
            jwt_secret: "integration-secret".to_string(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
        },
        ..HotelConfig::default()
    };

    let password_hash = bcrypt::hash(ADMIN_PASSWORD, 4).unwrap();
    db.users()
        .create(NewUser {
            username: "root".to_string(),
            password_hash,
            role: Role::Admin,
            email: None,
            hourly_rate: None,
            base_salary: None,
        })
        .await
        .unwrap();

    create_router(AppState::new(config, db))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(router: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/login",
            None,
            json!({ "username": username, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn register_guest(router: &Router, username: &str) -> String {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/register",
            None,
            json!({ "username": username, "password": "Gu3st!pass", "email": "guest@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    login(router, username, "Gu3st!pass").await
}

async fn create_room(router: &Router, token: &str, number: &str) -> i64 {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/rooms",
            Some(token),
            json!({
                "room_number": number,
                "room_type": "Deluxe",
                "base_price": 120.0,
                "capacity": 2
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "room create failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}

// =============================================================================
// Health and authentication
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let router = test_app().await;
    let (status, body) = send(&router, get_request("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn registered_guest_can_login_and_check_account() {
    let router = test_app().await;
    let token = register_guest(&router, "alice").await;

    let (status, body) = send(&router, get_request("/api/user/check", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "alice");
    assert_eq!(body["data"]["role"], "guest");
    assert_eq!(body["data"]["profile_complete"], true);
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let router = test_app().await;
    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/login",
            None,
            json!({ "username": "root", "password": "Wr0ng!pass" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn weak_password_is_rejected_at_registration() {
    let router = test_app().await;
    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/register",
            None,
            json!({ "username": "bob", "password": "password" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn anonymous_cannot_register_an_admin() {
    let router = test_app().await;
    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/api/register",
            None,
            json!({ "username": "mallory", "password": "Adm1n!pass", "role": "admin" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let router = test_app().await;
    register_guest(&router, "carol").await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/register",
            None,
            json!({ "username": "carol", "password": "Gu3st!pass" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "CONFLICT");
}

// =============================================================================
// Role enforcement
// =============================================================================

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let router = test_app().await;
    let (status, body) = send(&router, get_request("/api/rooms/all/list", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let router = test_app().await;
    let (status, _) = send(&router, get_request("/api/rooms/all/list", Some("not-a-jwt"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn guest_cannot_list_all_rooms() {
    let router = test_app().await;
    let token = register_guest(&router, "dave").await;

    let (status, body) = send(&router, get_request("/api/rooms/all/list", Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn menu_listing_is_public() {
    let router = test_app().await;
    let (status, body) = send(&router, get_request("/api/menu/items", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

// =============================================================================
// Request rejection mapping
// =============================================================================

#[tokio::test]
async fn malformed_json_is_reported() {
    let router = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"username\": "))
        .unwrap();

    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MALFORMED_JSON");
}

#[tokio::test]
async fn missing_content_type_is_reported() {
    let router = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .body(Body::from(json!({ "username": "root", "password": "x" }).to_string()))
        .unwrap();

    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_CONTENT_TYPE");
}

#[tokio::test]
async fn missing_field_is_a_validation_error() {
    let router = test_app().await;
    let (status, body) = send(
        &router,
        json_request("POST", "/api/login", None, json!({ "username": "root" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

// =============================================================================
// Bookings
// =============================================================================

#[tokio::test]
async fn booking_flips_room_and_second_booking_conflicts() {
    let router = test_app().await;
    let admin = login(&router, "root", ADMIN_PASSWORD).await;
    let room_id = create_room(&router, &admin, "101").await;

    let booking = json!({
        "room_id": room_id,
        "check_in_date": "2026-03-01",
        "check_out_date": "2026-03-04",
        "email": "guest@example.com"
    });

    let (status, body) = send(&router, json_request("POST", "/api/booking/create", Some(&admin), booking.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["status"], "pending");

    let (status, body) = send(
        &router,
        json_request("POST", "/api/rooms/view", Some(&admin), json!({ "id": room_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Unavailable");

    let (status, body) = send(&router, json_request("POST", "/api/booking/create", Some(&admin), booking)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ROOM_UNAVAILABLE");
}

#[tokio::test]
async fn cancelling_a_booking_releases_the_room() {
    let router = test_app().await;
    let admin = login(&router, "root", ADMIN_PASSWORD).await;
    let room_id = create_room(&router, &admin, "102").await;

    let (_, body) = send(
        &router,
        json_request(
            "POST",
            "/api/booking/create",
            Some(&admin),
            json!({ "room_id": room_id, "check_in_date": "2026-04-01", "check_out_date": "2026-04-02" }),
        ),
    )
    .await;
    let booking_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/booking/status/change",
            Some(&admin),
            json!({ "id": booking_id, "status": "cancelled" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], "cancelled");

    let (_, body) = send(&router, get_request("/api/rooms/availability", Some(&admin))).await;
    let available: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|room| room["id"].as_i64())
        .collect();
    assert!(available.contains(&room_id));
}

#[tokio::test]
async fn unknown_booking_status_is_rejected() {
    let router = test_app().await;
    let admin = login(&router, "root", ADMIN_PASSWORD).await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/booking/status/change",
            Some(&admin),
            json!({ "id": 1, "status": "archived" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_STATUS");
}

#[tokio::test]
async fn booking_a_missing_room_is_not_found() {
    let router = test_app().await;
    let admin = login(&router, "root", ADMIN_PASSWORD).await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/booking/create",
            Some(&admin),
            json!({ "room_id": 999, "check_in_date": "2026-05-01", "check_out_date": "2026-05-03" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn checkout_before_checkin_is_rejected() {
    let router = test_app().await;
    let admin = login(&router, "root", ADMIN_PASSWORD).await;
    let room_id = create_room(&router, &admin, "103").await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/booking/create",
            Some(&admin),
            json!({ "room_id": room_id, "check_in_date": "2026-05-03", "check_out_date": "2026-05-01" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

// =============================================================================
// Payroll
// =============================================================================

#[tokio::test]
async fn payroll_month_out_of_range_is_rejected() {
    let router = test_app().await;
    let admin = login(&router, "root", ADMIN_PASSWORD).await;

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/payroll/generate",
            Some(&admin),
            json!({ "employee_id": 1, "month": 13, "year": 2026, "hourly_rate": "20" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn guest_cannot_generate_payroll() {
    let router = test_app().await;
    let token = register_guest(&router, "erin").await;

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/api/payroll/generate",
            Some(&token),
            json!({ "employee_id": 1, "month": 1, "year": 2026 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
