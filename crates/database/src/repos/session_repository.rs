//! Session repository for database operations.

use crate::entities::{AuthSession, CreateSessionRequest};
use crate::types::{SessionError, SessionResult};
use sqlx::{Row, SqlitePool};

/// Repository for session database operations
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_session(row: &sqlx::sqlite::SqliteRow) -> SessionResult<AuthSession> {
        Ok(AuthSession {
            id: row
                .try_get("id")
                .map_err(|e| SessionError::DatabaseError(e.to_string()))?,
            user_id: row
                .try_get("user_id")
                .map_err(|e| SessionError::DatabaseError(e.to_string()))?,
            token: row
                .try_get("token")
                .map_err(|e| SessionError::DatabaseError(e.to_string()))?,
            expires_at: row
                .try_get("expires_at")
                .map_err(|e| SessionError::DatabaseError(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| SessionError::DatabaseError(e.to_string()))?,
        })
    }

    /// Persist a new session
    pub async fn create(&self, request: &CreateSessionRequest) -> SessionResult<AuthSession> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO auth_sessions (user_id, token, expires_at, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(request.user_id)
        .bind(&request.token)
        .bind(&request.expires_at)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(AuthSession {
            id: result.last_insert_rowid(),
            user_id: request.user_id,
            token: request.token.clone(),
            expires_at: request.expires_at.clone(),
            created_at: now,
        })
    }

    /// Find session by token
    pub async fn find_by_token(&self, token: &str) -> SessionResult<Option<AuthSession>> {
        let row = sqlx::query(
            "SELECT id, user_id, token, expires_at, created_at
             FROM auth_sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::map_session).transpose()
    }

    /// Remove a session by token. Missing tokens surface as
    /// `SessionNotFound`.
    pub async fn delete_by_token(&self, token: &str) -> SessionResult<()> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(SessionError::SessionNotFound);
        }

        Ok(())
    }

    /// Remove all sessions that expired before the given instant
    pub async fn delete_expired(&self, now: &str) -> SessionResult<u64> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
