//! Post entity definitions

use serde::{Deserialize, Serialize};

/// Blog post entity. Content is stored with mentions already expanded;
/// the author reference is set at creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub public_id: String,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request for creating a new post
#[derive(Debug, Clone)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

/// Request for updating an existing post. Only title and content are
/// mutable.
#[derive(Debug, Clone)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
}
