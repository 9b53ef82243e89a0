//! MongoDB connectivity shared by every service in the workspace
//!
//! - [`mongodb::MongoConfig`] loads connection settings via `core_config::FromEnv`
//! - [`mongodb::connect_from_config_with_retry`] opens a verified client with backoff
//! - [`mongodb::check_health`] backs the readiness probe
//! - [`mongodb::query`] holds filter-building helpers used by the domain repositories
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::mongodb::{self, MongoConfig};
//!
//! let config = MongoConfig::from_env()?;
//! let client = mongodb::connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};
