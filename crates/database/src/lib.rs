//! Minipress database crate
//!
//! Connection management, embedded migrations, and repository
//! implementations over SQLite for the Minipress blog backend.

use minipress_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::{PostRepository, SessionRepository, UserRepository};

pub use entities::{
    post::{CreatePostRequest, Post, UpdatePostRequest},
    session::{AuthSession, CreateSessionRequest},
    user::{CreateUserRequest, StoredCredentials, User},
};

pub use types::{
    errors::{DatabaseError, PostError, SessionError, UserError},
    DatabaseResult, PostResult, SessionResult, UserResult,
};

pub use sqlx::Pool;

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}
