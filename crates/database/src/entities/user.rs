//! User entity definitions

use serde::{Deserialize, Serialize};

/// User entity representing a registered author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub public_id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Display name used when a mention of this user is expanded.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Request for creating a new user. The password arrives already hashed;
/// hashing lives in the auth crate.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
}

/// Credential material fetched for password verification.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    pub user_id: i64,
    pub password_hash: String,
}
