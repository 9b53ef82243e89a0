//! Order domain error types

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::models::OrderStatus;

/// Result type for order operations
pub type OrderResult<T> = Result<T, OrderError>;

/// Order domain errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(Uuid),

    #[error("Product {0} not found")]
    ProductNotFound(Uuid),

    #[error("Product {0} is out of stock")]
    OutOfStock(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<mongodb::error::Error> for OrderError {
    fn from(err: mongodb::error::Error) -> Self {
        OrderError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for OrderError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        OrderError::Internal(format!("BSON serialization error: {err}"))
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::NotFound(_) => AppError::NotFound("Order not found".to_string()),
            OrderError::ProductNotFound(_) => AppError::NotFound(message),
            OrderError::OutOfStock(_) | OrderError::InvalidTransition { .. } => {
                AppError::BadRequest(message)
            }
            OrderError::Forbidden(msg) => AppError::Forbidden(msg),
            OrderError::Validation(msg) => AppError::BadRequest(msg),
            OrderError::InvalidInput(errors) => AppError::ValidationError(errors),
            OrderError::Database(msg) => AppError::Database(msg),
            OrderError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
