//! Repository for post data access operations.

use crate::entities::{CreatePostRequest, Post, UpdatePostRequest};
use crate::types::{PostError, PostResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

const POST_COLUMNS: &str = "id, public_id, title, content, author_id, created_at, updated_at";

/// Repository for post database operations
#[derive(Clone)]
pub struct PostRepository {
    pool: SqlitePool,
}

impl PostRepository {
    /// Create a new post repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn map_post(row: &sqlx::sqlite::SqliteRow) -> PostResult<Post> {
        Ok(Post {
            id: row
                .try_get("id")
                .map_err(|e| PostError::DatabaseError(e.to_string()))?,
            public_id: row
                .try_get("public_id")
                .map_err(|e| PostError::DatabaseError(e.to_string()))?,
            title: row
                .try_get("title")
                .map_err(|e| PostError::DatabaseError(e.to_string()))?,
            content: row
                .try_get("content")
                .map_err(|e| PostError::DatabaseError(e.to_string()))?,
            author_id: row
                .try_get("author_id")
                .map_err(|e| PostError::DatabaseError(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| PostError::DatabaseError(e.to_string()))?,
            updated_at: row
                .try_get("updated_at")
                .map_err(|e| PostError::DatabaseError(e.to_string()))?,
        })
    }

    /// Create a new post owned by the given author
    pub async fn create(&self, author_id: i64, request: &CreatePostRequest) -> PostResult<Post> {
        let public_id = cuid2::cuid();
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO posts (public_id, title, content, author_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.title)
        .bind(&request.content)
        .bind(author_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| PostError::DatabaseError(e.to_string()))?;

        let post_id = result.last_insert_rowid();

        info!(post_id, public_id = %public_id, author_id, "created new post");

        Ok(Post {
            id: post_id,
            public_id,
            title: request.title.clone(),
            content: request.content.clone(),
            author_id,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Find a post by its identifier
    pub async fn find_by_id(&self, id: i64) -> PostResult<Option<Post>> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PostError::DatabaseError(e.to_string()))?;

        row.as_ref().map(Self::map_post).transpose()
    }

    /// List all posts in storage order
    pub async fn list_all(&self) -> PostResult<Vec<Post>> {
        let rows = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PostError::DatabaseError(e.to_string()))?;

        rows.iter().map(Self::map_post).collect()
    }

    /// Overwrite a post's title and content
    pub async fn update(&self, id: i64, request: &UpdatePostRequest) -> PostResult<Post> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "UPDATE posts SET title = ?, content = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&request.title)
        .bind(&request.content)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| PostError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PostError::PostNotFound);
        }

        self.find_by_id(id).await?.ok_or(PostError::PostNotFound)
    }

    /// Delete a post
    pub async fn delete(&self, id: i64) -> PostResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PostError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PostError::PostNotFound);
        }

        info!(post_id = id, "deleted post");
        Ok(())
    }
}
