//! User repository for database operations.

use crate::entities::{CreateUserRequest, StoredCredentials, User};
use crate::types::{UserError, UserResult};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;

const USER_COLUMNS: &str =
    "id, public_id, username, email, first_name, last_name, created_at, updated_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_user(row: &sqlx::sqlite::SqliteRow) -> UserResult<User> {
        Ok(User {
            id: row
                .try_get("id")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            public_id: row
                .try_get("public_id")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            username: row
                .try_get("username")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            email: row
                .try_get("email")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            first_name: row
                .try_get("first_name")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            last_name: row
                .try_get("last_name")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            updated_at: row
                .try_get("updated_at")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        })
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::map_user).transpose()
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::map_user).transpose()
    }

    /// Create new user
    pub async fn create(&self, request: &CreateUserRequest) -> UserResult<User> {
        let now = Utc::now().to_rfc3339();
        let public_id = cuid2::cuid();

        let result = sqlx::query(
            "INSERT INTO users (public_id, username, email, first_name, last_name, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.username)
        .bind(&request.email)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let message = e.to_string();
            if message.contains("UNIQUE constraint failed") {
                if message.contains("users.email") {
                    UserError::EmailAlreadyExists
                } else {
                    UserError::UsernameAlreadyExists
                }
            } else {
                UserError::DatabaseError(message)
            }
        })?;

        let user_id = result.last_insert_rowid();

        info!(user_id, username = %request.username, "created new user");

        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| UserError::DatabaseError("Failed to retrieve created user".to_string()))
    }

    /// Fetch the stored credential material for a username, if any.
    pub async fn credentials_by_username(
        &self,
        username: &str,
    ) -> UserResult<Option<StoredCredentials>> {
        let row = sqlx::query("SELECT id, password_hash FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        if let Some(row) = row {
            Ok(Some(StoredCredentials {
                user_id: row
                    .try_get("id")
                    .map_err(|e| UserError::DatabaseError(e.to_string()))?,
                password_hash: row
                    .try_get("password_hash")
                    .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Return the subset of the candidate usernames that exist, in storage
    /// order. Powers the mention lookup endpoint.
    pub async fn find_existing_usernames(&self, candidates: &[String]) -> UserResult<Vec<String>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = candidates.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let query_str = format!(
            "SELECT username FROM users WHERE username IN ({placeholders}) ORDER BY id"
        );

        let mut query = sqlx::query_scalar::<_, String>(&query_str);
        for candidate in candidates {
            query = query.bind(candidate);
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))
    }

    /// Get user count
    pub async fn count(&self) -> UserResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserError::DatabaseError(e.to_string()))
    }
}
