//! Authenticated-user extractors.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use crate::api::{ApiErrorResponse, AppState};
use crate::error::{HotelError, HotelResult};
use crate::models::Role;

use super::jwt::extract_bearer;

/// The caller identified by a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    /// User id.
    pub id: i64,
    /// User role.
    pub role: Role,
}

impl AuthUser {
    /// Fails with [`HotelError::Forbidden`] unless the caller holds one of `roles`.
    pub fn require_any(&self, roles: &[Role]) -> HotelResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(HotelError::forbidden(format!(
                "role '{}' may not perform this action",
                self.role
            )))
        }
    }

    /// Returns true for administrators.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn authenticate(parts: &Parts, state: &AppState) -> HotelResult<Option<AuthUser>> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let token = header
        .to_str()
        .ok()
        .and_then(extract_bearer)
        .ok_or_else(|| HotelError::unauthorized("invalid authorization header"))?;
    let claims = state.tokens().verify(token).inspect_err(|e| {
        warn!(error = %e, uri = %parts.uri, "Rejected bearer token");
    })?;
    Ok(Some(AuthUser {
        id: claims.id,
        role: claims.role,
    }))
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state)? {
            Some(user) => Ok(user),
            None => Err(HotelError::unauthorized("missing bearer token").into()),
        }
    }
}

/// Like [`AuthUser`], but a request without an Authorization header is
/// let through anonymously. A present but invalid token is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(authenticate(parts, state)?))
    }
}
