//! Session authentication.
//!
//! Usage: Add `AuthUser` as an extractor parameter to require a signed-in user.
//! The user id is whatever the identity provider reports for the bearer token;
//! it is opaque to this service and only used as a storage namespace.
//!
//! ```ignore
//! async fn my_handler(user: AuthUser, ...) -> ... {
//!     // user.id is available here
//! }
//! ```

use axum::{
    Json, RequestPartsExt,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use shared::api::ErrorResponse;

use crate::state::AppState;

/// Signed-in user extracted from a verified session token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::MissingToken)?;

        let id = state
            .identity
            .verify(bearer.token())
            .await
            .map_err(|e| {
                tracing::error!("session verification error: {:?}", e);
                AuthError::InvalidToken
            })?
            .ok_or(AuthError::InvalidToken)?;

        Ok(AuthUser { id })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidToken => "Invalid or expired token",
        };

        let body = ErrorResponse {
            error: message.into(),
            details: None,
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
