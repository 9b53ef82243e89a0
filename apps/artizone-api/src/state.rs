//! Shared application state handed to the route builders.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Shares the driver's connection pool across clones
    pub mongo_client: Client,
    pub db: Database,
    /// Token issuer and verifier built from `config.jwt`
    pub jwt: JwtAuth,
}

impl AppState {
    pub fn new(config: Config, mongo_client: Client, db: Database) -> Self {
        let jwt = JwtAuth::new(&config.jwt);
        Self {
            config,
            mongo_client,
            db,
            jwt,
        }
    }
}
