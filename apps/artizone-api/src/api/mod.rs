//! API routes module
//!
//! Every domain router sits behind the bearer-token middleware; the
//! extractors in each handler decide whether a caller is required.

pub mod ai;
pub mod events;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use axum::{Router, middleware};
use domain_users::{Authenticator, MongoUserRepository, authenticate};

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    let authenticator =
        Authenticator::new(state.jwt.clone(), MongoUserRepository::new(&state.db));

    Router::new()
        .merge(users::router(state))
        .nest("/products", products::router(state))
        .nest("/events", events::router(state))
        .nest("/orders", orders::router(state))
        .nest("/ai", ai::router(state))
        .layer(middleware::from_fn_with_state(
            authenticator,
            authenticate::<MongoUserRepository>,
        ))
        .merge(health::router(state.clone()))
}

/// Create collection indexes for every domain that declares them
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    users::init_indexes(db).await?;
    products::init_indexes(db).await?;
    events::init_indexes(db).await?;
    orders::init_indexes(db).await?;
    Ok(())
}
