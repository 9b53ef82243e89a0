//! AI domain error types

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Result type for AI operations
pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationErrors),

    /// Text generation or transcription backend failed
    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<mongodb::error::Error> for AiError {
    fn from(err: mongodb::error::Error) -> Self {
        AiError::Database(err.to_string())
    }
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Generation(err.to_string())
    }
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::UserNotFound(_) => AppError::NotFound("User not found".to_string()),
            AiError::Validation(msg) => AppError::BadRequest(msg),
            AiError::InvalidInput(errors) => AppError::ValidationError(errors),
            AiError::Generation(msg) => AppError::Upstream(msg),
            AiError::Database(msg) => AppError::Database(msg),
            AiError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for AiError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_generation_failure_is_server_error() {
        let app_error = AppError::from(AiError::Generation("timeout".to_string()));
        assert_eq!(app_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_user_is_not_found() {
        let app_error = AppError::from(AiError::UserNotFound(Uuid::nil()));
        assert_eq!(app_error.status(), StatusCode::NOT_FOUND);
    }
}
