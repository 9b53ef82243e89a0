//! Event domain error types

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::models::EventStatus;

/// Result type for event operations
pub type EventResult<T> = Result<T, EventError>;

/// Event domain errors
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("{0}")]
    Forbidden(String),

    #[error("Event is not available for registration")]
    NotOpen,

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("Event is at full capacity")]
    Full,

    #[error("You are not registered for this event")]
    NotRegistered,

    #[error("Cannot change event status from {from} to {to}")]
    InvalidTransition { from: EventStatus, to: EventStatus },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationErrors),

    #[error("Event is changing too quickly, please retry")]
    Contended,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        EventError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for EventError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        EventError::Internal(format!("BSON serialization error: {err}"))
    }
}

// Convert to axum_helpers::AppError for HTTP responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        let message = err.to_string();
        match err {
            EventError::NotFound(_) => AppError::NotFound("Event not found".to_string()),
            EventError::Forbidden(msg) => AppError::Forbidden(msg),
            EventError::NotOpen | EventError::InvalidTransition { .. } => {
                AppError::BadRequest(message)
            }
            EventError::AlreadyRegistered | EventError::Contended => AppError::Conflict(message),
            EventError::Full => AppError::Capacity(message),
            EventError::NotRegistered => AppError::NotFound(message),
            EventError::Validation(msg) => AppError::BadRequest(msg),
            EventError::InvalidInput(errors) => AppError::ValidationError(errors),
            EventError::Database(msg) => AppError::Database(msg),
            EventError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EventError {
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
    fn test_registration_errors_map_to_bad_request() {
        for err in [EventError::NotOpen, EventError::AlreadyRegistered, EventError::Full] {
            assert_eq!(AppError::from(err).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_missing_registration_is_not_found() {
        let app_error = AppError::from(EventError::NotRegistered);
        assert_eq!(app_error.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = EventError::InvalidTransition {
            from: EventStatus::Completed,
            to: EventStatus::Draft,
        };
        assert_eq!(err.to_string(), "Cannot change event status from completed to draft");
    }
}
