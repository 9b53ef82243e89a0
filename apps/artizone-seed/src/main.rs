//! Resets the marketplace database to a small, known set of accounts,
//! listings and events for local development.

use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use database::mongodb::{MongoConfig, connect_from_config_with_retry};
use domain_events::{EventRepository, MongoEventRepository};
use domain_orders::MongoOrderRepository;
use domain_products::{MongoProductRepository, ProductRepository};
use domain_users::{MongoUserRepository, Role, UserRepository, hash_password};
use mongodb::{Database, bson::Document, bson::doc};
use tracing::info;

mod fixtures;

/// Every collection the API writes to
const COLLECTIONS: [&str; 5] = ["users", "products", "events", "orders", "counters"];

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let config = MongoConfig::from_env()?;
    let client = connect_from_config_with_retry(&config, None).await?;
    let db = client.database(config.database());

    clear(&db).await?;
    seed(&db).await?;

    info!("Seed complete; every account uses the password '{}'", fixtures::PASSWORD);
    Ok(())
}

async fn clear(db: &Database) -> eyre::Result<()> {
    for name in COLLECTIONS {
        let result = db.collection::<Document>(name).delete_many(doc! {}).await?;
        info!(collection = name, deleted = result.deleted_count, "Cleared collection");
    }
    Ok(())
}

async fn seed(db: &Database) -> eyre::Result<()> {
    let users = MongoUserRepository::new(db);
    let products = MongoProductRepository::new(db);
    let events = MongoEventRepository::new(db);

    users.init_indexes().await?;
    products.init_indexes().await?;
    events.create_indexes().await?;
    MongoOrderRepository::new(db).create_indexes().await?;

    let password_hash = hash_password(fixtures::PASSWORD)?;
    let accounts = fixtures::users(&password_hash);

    let mut artisans = Vec::new();
    let mut vendors = Vec::new();
    for user in accounts {
        let user = users.create(user).await?;
        match user.role() {
            Role::Artisan => artisans.push(user),
            Role::Vendor => vendors.push(user),
            Role::Customer => {}
        }
    }
    info!(artisans = artisans.len(), vendors = vendors.len(), "Created users");

    for product in fixtures::products(&artisans)? {
        let product = products.create(product).await?;
        info!(title = %product.title, "Created product");
    }

    for event in fixtures::events(&artisans, &vendors)? {
        let event = events.create(event).await?;
        info!(title = %event.title, "Created event");
    }

    Ok(())
}
