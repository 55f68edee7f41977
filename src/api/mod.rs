//! HTTP API for the hotel back office.
//!
//! All routes live under `/api` except `/health`. Handlers authenticate
//! through the [`crate::auth::AuthUser`] extractor, gate on role, then
//! call a repository or service and wrap the result in [`ApiResponse`].

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ValidJson;
pub use response::{ApiError, ApiErrorResponse, ApiResponse, ApiResult};
pub use state::AppState;
