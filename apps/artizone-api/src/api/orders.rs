//! Order routes, priced against the live product catalog

use axum::Router;
use domain_orders::{MongoOrderRepository, MongoProductCatalog, OrderService};
use tracing::info;

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let repository = MongoOrderRepository::new(&state.db);
    let catalog = MongoProductCatalog::new(&state.db);
    domain_orders::router(OrderService::new(repository, catalog))
}

/// Order number uniqueness plus the per-party listing indexes
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoOrderRepository::new(db)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create order indexes: {}", e))?;
    info!("Order collection indexes created");
    Ok(())
}
