use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use weatherapp_core::error::CoreError;

/// Message returned for every internal failure. The detail is logged only.
const INTERNAL_MESSAGE: &str = "Internal service error occurred, try later";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `weatherapp_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Core(core) = self;

        let (status, code, message) = match &core {
            CoreError::Validation(violations) => {
                let body = json!({
                    "error": "Validation failed",
                    "code": "VALIDATION_ERROR",
                    "details": violations,
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }
            CoreError::UserAlreadyExists => (
                StatusCode::CONFLICT,
                "USER_ALREADY_EXISTS",
                core.to_string(),
            ),
            CoreError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                core.to_string(),
            ),
            CoreError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", core.to_string()),
            CoreError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
