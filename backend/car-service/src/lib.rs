// Car Service Library

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

pub use error::{AppError, Result};

use chrono::Duration;
use std::sync::Arc;

use db::{CarRepository, RevocationStore, UserRepository};
use security::JwtKeys;
use services::{CredentialStore, TokenService};

/// Shared services, built once in `main` and handed to every worker
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialStore,
    pub tokens: TokenService,
    pub revocations: Arc<dyn RevocationStore>,
    pub cars: Arc<dyn CarRepository>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        revocations: Arc<dyn RevocationStore>,
        cars: Arc<dyn CarRepository>,
        keys: JwtKeys,
        ttl: Duration,
        leeway_secs: u64,
    ) -> Self {
        let tokens = TokenService::new(Arc::new(keys), revocations.clone(), ttl, leeway_secs);
        Self {
            credentials: CredentialStore::new(users),
            tokens,
            revocations,
            cars,
        }
    }
}
