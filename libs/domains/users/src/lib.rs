//! Users Domain
//!
//! Accounts for artisans, vendors and customers, plus the request
//! authentication every other domain relies on.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐
//! │  Handlers   │   │ authenticate │  ← bearer token → AuthUser
//! └──────┬──────┘   └──────┬───────┘
//!        │                 │
//! ┌──────▼──────┐          │
//! │   Service   │  ← argon2 hashing, JWT issuing, directory paging
//! └──────┬──────┘          │
//!        │                 │
//! ┌──────▼─────────────────▼┐
//! │       Repository        │  ← trait + MongoDB implementation
//! └─────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum::{Router, middleware};
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_users::{Authenticator, MongoUserRepository, UserService, authenticate, handlers};
//!
//! # async fn example(db: mongodb::Database) -> Result<(), Box<dyn std::error::Error>> {
//! let jwt = JwtAuth::new(&JwtConfig::new("0123456789abcdef0123456789abcdef")?);
//! let repository = MongoUserRepository::new(&db);
//!
//! let authenticator = Authenticator::new(jwt.clone(), repository.clone());
//! let api: Router = handlers::router(UserService::new(repository, jwt)).layer(
//!     middleware::from_fn_with_state(authenticator, authenticate::<MongoUserRepository>),
//! );
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use auth::{
    ArtisanOnly, AuthFailure, AuthUser, Authenticator, Authorized, CustomerOnly, RoleGuard,
    VendorOnly, authenticate,
};
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{
    ArtisanProfile, CustomerProfile, Profile, PublicUserProfile, RatingSummary, Role,
    RoleProfile, User, UserResponse, VendorProfile,
};
pub use mongodb::MongoUserRepository;
pub use repository::UserRepository;
pub use service::{UserService, hash_password};
