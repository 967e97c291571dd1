//! Domain entities for the database layer

pub mod post;
pub mod session;
pub mod user;

pub use post::{CreatePostRequest, Post, UpdatePostRequest};
pub use session::{AuthSession, CreateSessionRequest};
pub use user::{CreateUserRequest, StoredCredentials, User};
