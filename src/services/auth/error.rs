use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Authentication / authorization failure.
///
/// `code` is machine-readable and stable; `message` is for humans. Both are
/// rendered as-is in the response body, with `status` (always 401 today).
#[derive(Debug, Clone, Error, Serialize)]
#[error("{code}: {message}")]
pub struct AuthError {
    pub code: &'static str,
    pub message: &'static str,
    #[serde(skip)]
    pub status: StatusCode,
}

impl AuthError {
    fn unauthorized(code: &'static str, message: &'static str) -> Self {
        Self {
            code,
            message,
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn header_missing() -> Self {
        Self::unauthorized(
            "authorization_header_missing",
            "Authorization header is expected.",
        )
    }

    pub fn bearer_not_found() -> Self {
        Self::unauthorized(
            "invalid_authorization",
            "Authorization header must be of the form 'Bearer <token>'.",
        )
    }

    pub fn bearer_empty() -> Self {
        Self::unauthorized("invalid_authorization", "Bearer token is empty.")
    }

    pub fn undecodable_header() -> Self {
        Self::unauthorized("invalid_header", "Error decoding token headers.")
    }

    pub fn missing_kid() -> Self {
        Self::unauthorized("invalid_header", "Authorization malformed.")
    }

    pub fn key_not_found() -> Self {
        Self::unauthorized("invalid_header", "Unable to find the appropriate key.")
    }

    pub fn unparsable_token() -> Self {
        Self::unauthorized("invalid_header", "Unable to parse authentication token.")
    }

    pub fn token_expired() -> Self {
        Self::unauthorized("token_expired", "Token expired.")
    }

    pub fn invalid_claims() -> Self {
        Self::unauthorized(
            "invalid_claims",
            "Incorrect claims. Please, check the audience and issuer.",
        )
    }

    pub fn permissions_missing() -> Self {
        Self::unauthorized("access_denied", "Permissions not included in token.")
    }

    pub fn permission_denied() -> Self {
        Self::unauthorized("access_denied", "Permission not granted for this action.")
    }
}
