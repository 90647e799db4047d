/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error envelope)
 * - RepoError / AuthError / JwksError を統一的に変換
 *
 * Every failure is rendered as:
 *   {"success": false, "error": {"code": "...", "message": "..."}}
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::{AuthError, JwksError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("resource not found")]
    NotFound,
    #[error("resource already exists")]
    Conflict,
    #[error("unsupported media type")]
    UnsupportedMediaType,
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("unprocessable entity: {0}")]
    Unprocessable(&'static str),
    #[error("request timed out")]
    RequestTimeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(e) => e.status,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let (code, message) = match self {
            AppError::Auth(e) => (e.code, e.message.to_string()),
            AppError::NotFound => ("not_found", "Resource not found".to_string()),
            AppError::Conflict => (
                "conflict",
                "A drink with this title already exists".to_string(),
            ),
            AppError::UnsupportedMediaType => (
                "unsupported_media_type",
                "Unsupported media type".to_string(),
            ),
            AppError::PayloadTooLarge => (
                "payload_too_large",
                "Request body too large".to_string(),
            ),
            AppError::Unprocessable(reason) => ("unprocessable", reason.to_string()),
            AppError::RequestTimeout => ("request_timeout", "Request timed out".to_string()),
            AppError::Internal => (
                "internal_server_error",
                "Internal server error".to_string(),
            ),
        };

        ErrorBody { code, message }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.body(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::Conflict,
            other => {
                tracing::error!(error = %other, "storage operation failed");
                AppError::Internal
            }
        }
    }
}

impl From<JwksError> for AppError {
    fn from(e: JwksError) -> Self {
        // Key-set fetch failures are server-side.
        tracing::error!(error = %e, "unable to obtain signing keys");
        AppError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn client_errors_use_the_uniform_envelope() {
        let cases = [
            (AppError::NotFound, 404, "not_found"),
            (AppError::Conflict, 409, "conflict"),
            (AppError::UnsupportedMediaType, 415, "unsupported_media_type"),
            (AppError::PayloadTooLarge, 413, "payload_too_large"),
            (AppError::Unprocessable("missing title"), 422, "unprocessable"),
            (AppError::Internal, 500, "internal_server_error"),
        ];

        for (err, status, code) in cases {
            let (actual, body) = body_json(err).await;
            assert_eq!(actual.as_u16(), status);
            assert_eq!(body["success"], false);
            assert_eq!(body["error"]["code"], code);
            assert!(body["error"]["message"].is_string());
        }
    }

    #[tokio::test]
    async fn auth_errors_surface_their_own_code() {
        let (status, body) = body_json(AuthError::token_expired().into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "token_expired");
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        assert!(matches!(
            AppError::from(RepoError::Conflict),
            AppError::Conflict
        ));
    }
}
