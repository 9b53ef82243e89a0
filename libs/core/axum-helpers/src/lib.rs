//! # Axum Helpers
//!
//! Shared HTTP plumbing for the Artizone services.
//!
//! - **[`auth`]**: JWT issuing/verification and bearer-token extraction
//! - **[`server`]**: router assembly with API docs, health endpoint, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: [`AppError`] and the JSON error envelope
//! - **[`extractors`]**: [`UuidPath`] and [`ValidatedJson`]
//! - **[`pagination`]**: page/limit arithmetic and sort direction

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod pagination;
pub mod server;

pub use auth::{JwtAuth, JwtClaims, JwtConfig, bearer_token};
pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{UuidPath, ValidatedJson};
pub use http::security_headers;
pub use pagination::{Pagination, SortOrder};
pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, build_router, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
