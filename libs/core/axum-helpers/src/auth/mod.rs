//! Stateless JWT authentication.
//!
//! [`JwtAuth`] issues and verifies HS256 tokens; [`bearer_token`] pulls a token
//! out of a request. Resolving claims to a user is left to the users domain.
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig};
//! use core_config::FromEnv;
//!
//! let jwt = JwtAuth::new(&JwtConfig::from_env()?);
//! let token = jwt.create_token(user_id, "sarah@example.com", "artisan")?;
//! let claims = jwt.verify_token(&token)?;
//! ```

pub mod config;
pub mod jwt;
pub mod token;

pub use config::JwtConfig;
pub use jwt::{DEFAULT_TOKEN_TTL, JwtAuth, JwtClaims};
pub use token::bearer_token;
