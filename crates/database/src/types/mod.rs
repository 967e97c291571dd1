//! Shared types and result types for the database layer

pub mod errors;

pub use errors::{DatabaseError, PostError, SessionError, UserError};

pub type DatabaseResult<T> = Result<T, DatabaseError>;
pub type UserResult<T> = Result<T, UserError>;
pub type PostResult<T> = Result<T, PostError>;
pub type SessionResult<T> = Result<T, SessionError>;
