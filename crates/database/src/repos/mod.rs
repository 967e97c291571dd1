//! Database repository implementations

pub mod post_repository;
pub mod session_repository;
pub mod user_repository;

pub use post_repository::*;
pub use session_repository::*;
pub use user_repository::*;
