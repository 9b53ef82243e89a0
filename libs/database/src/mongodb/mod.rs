//! MongoDB connection management and query helpers

mod config;
mod connector;
mod health;
pub mod query;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use health::{HealthStatus, check_health, check_health_detailed};

pub use mongodb::{Client, Collection, Database};
