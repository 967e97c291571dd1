//! Error types for the database layer

use thiserror::Error;

/// General database error
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Database migration error: {0}")]
    MigrationError(String),

    #[error("Database query error: {0}")]
    QueryError(String),
}

/// User-specific database errors
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("Username already exists")]
    UsernameAlreadyExists,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Post-specific database errors
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Post not found")]
    PostNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Session-specific database errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
