//! Response types for the hotel back-office API.
//!
//! Every endpoint answers with the same envelope:
//! `{ success, message, data?, error? }`. Successful calls carry `data`;
//! failed calls carry a stable machine code in `error`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::error::HotelError;

/// Successful response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    status: StatusCode,
    /// Always `true`.
    pub success: bool,
    /// Human-readable summary.
    pub message: String,
    /// Response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 201 with the created entity.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            ..Self::ok(message, data)
        }
    }
}

impl ApiResponse<()> {
    /// 200 without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// API error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub message: String,
    /// Error code for programmatic handling.
    #[serde(rename = "error")]
    pub code: String,
    /// Id to match the response against server logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: code.into(),
            correlation_id: None,
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

/// Type returned by every handler.
pub type ApiResult<T> = Result<ApiResponse<T>, ApiErrorResponse>;

impl From<HotelError> for ApiErrorResponse {
    fn from(err: HotelError) -> Self {
        let correlation_id = Uuid::new_v4();
        let (status, code) = match &err {
            HotelError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            HotelError::InvalidStatus { .. } => (StatusCode::BAD_REQUEST, "INVALID_STATUS"),
            HotelError::RoomNotFound { .. }
            | HotelError::BookingNotFound { .. }
            | HotelError::EmployeeNotFound { .. }
            | HotelError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            HotelError::RoomUnavailable { .. } => (StatusCode::CONFLICT, "ROOM_UNAVAILABLE"),
            HotelError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            HotelError::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            HotelError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            HotelError::ConfigNotFound { .. }
            | HotelError::ConfigParseError { .. }
            | HotelError::Database(_)
            | HotelError::Migration(_)
            | HotelError::PasswordHash { .. }
            | HotelError::Token { .. }
            | HotelError::Notification { .. } => {
                error!(correlation_id = %correlation_id, error = %err, "Request failed");
                let mut body = ApiError::new("INTERNAL_ERROR", "An internal error occurred");
                body.correlation_id = Some(correlation_id);
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: body,
                };
            }
        };

        warn!(
            correlation_id = %correlation_id,
            status = status.as_u16(),
            error = %err,
            "Request rejected"
        );
        let mut body = ApiError::new(code, err.to_string());
        body.correlation_id = Some(correlation_id);
        Self { status, error: body }
    }
}

impl From<ValidationErrors> for ApiErrorResponse {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reasons: Vec<String> = errs
                    .iter()
                    .map(|e| e.message.as_ref().map_or_else(|| e.code.to_string(), |m| m.to_string()))
                    .collect();
                format!("{}: {}", field, reasons.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");
        // Nested structs report through `errors()` only.
        let message = if message.is_empty() { errors.to_string() } else { message };
        warn!(error = %message, "Request validation failed");
        Self::bad_request(ApiError::validation_error(message))
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let correlation_id = Uuid::new_v4();
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                let body_text = err.body_text();
                warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
                if body_text.contains("missing field") {
                    ApiError::validation_error(body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Self::bad_request(error)
    }
}

impl From<QueryRejection> for ApiErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        let message = rejection.body_text();
        warn!(error = %message, "Query string rejected");
        Self::bad_request(ApiError::validation_error(message))
    }
}

impl From<PathRejection> for ApiErrorResponse {
    fn from(rejection: PathRejection) -> Self {
        let message = rejection.body_text();
        warn!(error = %message, "Path parameter rejected");
        Self::bad_request(ApiError::validation_error(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_serialization() {
        let response = ApiResponse::ok("Room fetched", serde_json::json!({"id": 1}));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Room fetched");
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_message_only_envelope_skips_data() {
        let json = serde_json::to_string(&ApiResponse::message("Deleted")).unwrap();
        assert!(!json.contains("data"));
    }

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"error\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("correlation_id"));
    }

    #[test]
    fn test_room_unavailable_maps_to_conflict() {
        let response: ApiErrorResponse = HotelError::RoomUnavailable {
            room_id: 3,
            status: "Unavailable".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "ROOM_UNAVAILABLE");
    }

    #[test]
    fn test_invalid_status_maps_to_bad_request() {
        let response: ApiErrorResponse = HotelError::InvalidStatus {
            entity: "booking",
            value: "archived".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_STATUS");
    }

    #[test]
    fn test_database_error_is_not_echoed() {
        let response: ApiErrorResponse = HotelError::Database(sqlx::Error::PoolClosed).into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error.code, "INTERNAL_ERROR");
        assert!(!response.error.message.contains("pool"));
        assert!(response.error.correlation_id.is_some());
    }

    #[test]
    fn test_not_found_variants_share_code() {
        for err in [
            HotelError::BookingNotFound { booking_id: 1 },
            HotelError::EmployeeNotFound { employee_id: 1 },
            HotelError::not_found("Guest", 1),
        ] {
            let response: ApiErrorResponse = err.into();
            assert_eq!(response.status, StatusCode::NOT_FOUND);
            assert_eq!(response.error.code, "NOT_FOUND");
        }
    }
}
