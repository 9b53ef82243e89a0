//! Marketplace event routes

use axum::Router;
use domain_events::{EventService, MongoEventRepository};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoEventRepository::new(&state.db);
    domain_events::router(EventService::new(repository))
}

pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoEventRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create event indexes: {}", e))?;
    info!("Event collection indexes created");
    Ok(())
}
