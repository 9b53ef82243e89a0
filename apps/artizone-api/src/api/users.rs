//! Auth and profile routes, merged at the API root (`/auth/*`, `/users/*`)

use axum::Router;
use domain_users::{MongoUserRepository, UserService};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoUserRepository::new(&state.db);
    let service = UserService::new(repository, state.jwt.clone());
    domain_users::handlers::router(service)
}

/// Unique email index
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoUserRepository::new(db)
        .init_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create user indexes: {}", e))?;
    info!("User collection indexes created");
    Ok(())
}
