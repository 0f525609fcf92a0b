use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use record_locking_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and implements [`IntoResponse`] to produce consistent
/// `{ "error": ..., "code": ... }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `record_locking_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Core(core) = &self;
        let (status, code, message) = match core {
            CoreError::PermissionDenied { .. } => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", core.to_string())
            }
            CoreError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            CoreError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            // A lock whose owner cannot be named is useless to the UI; report
            // failure so it shows "status unknown" rather than "unlocked".
            CoreError::UserNotFound(user_id) => {
                tracing::error!(user_id = %user_id, "Lock holder missing from user directory");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "HOLDER_UNRESOLVED",
                    "Lock holder could not be resolved".to_string(),
                )
            }
            CoreError::Collaborator {
                collaborator,
                source,
            } => {
                tracing::error!(%collaborator, error = %source, "Collaborator failure");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "COLLABORATOR_UNAVAILABLE",
                    format!("The {collaborator} is unavailable"),
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
