//! Shared application state for the gateway

use minipress_auth::Authenticator;
use minipress_config::AppConfig;
use minipress_database::{PostRepository, UserRepository};
use sqlx::SqlitePool;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Authentication service
    pub authenticator: Authenticator,
    /// User lookups for mention expansion and the lookup endpoint
    pub users: UserRepository,
    /// Post persistence
    pub posts: PostRepository,
}

impl GatewayState {
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        Self {
            authenticator: Authenticator::new(pool.clone(), config.auth.clone()),
            users: UserRepository::new(pool.clone()),
            posts: PostRepository::new(pool.clone()),
            pool,
        }
    }
}
