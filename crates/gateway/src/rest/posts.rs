//! Post CRUD endpoints.
//!
//! Mention expansion happens here, at the write boundary: before a post is
//! created or updated, its content is scanned for `@username` tokens, the
//! distinct candidates are resolved against the user store, and matching
//! tokens are replaced with full names. The stored row never contains a
//! resolvable mention.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use minipress_database::{CreatePostRequest, Post, UpdatePostRequest, UserRepository};
use minipress_forms::PostForm;
use minipress_mentions::DisplayName;
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::state::GatewayState;

pub fn create_post_routes() -> Router<GatewayState> {
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/new", get(show_create))
        .route(
            "/api/posts/:id",
            get(show_post).put(update_post).delete(delete_post),
        )
        .route("/api/posts/:id/edit", get(show_edit))
        .route("/api/posts/:id/delete", get(show_delete))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub id: i64,
    pub public_id: String,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            public_id: post.public_id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Resolve every distinct scanned candidate once, then run the pure
/// expansion over the prefetched directory.
async fn expand_mentions(users: &UserRepository, content: &str) -> Result<String, ApiError> {
    let mut directory: HashMap<String, Option<DisplayName>> = HashMap::new();

    for username in minipress_mentions::scan(content) {
        if directory.contains_key(&username) {
            continue;
        }
        let entry = users
            .find_by_username(&username)
            .await?
            .map(|user| DisplayName::new(user.first_name, user.last_name));
        directory.insert(username, entry);
    }

    Ok(minipress_mentions::expand(content, |username| {
        directory.get(username).cloned().flatten()
    }))
}

fn post_form_context(template: &str, form: &PostForm) -> serde_json::Value {
    json!({
        "template": template,
        "form": {
            "title": form.title,
            "content": form.content,
        },
    })
}

fn validation_failure(context: serde_json::Value, message: &str) -> Response {
    let mut context = context;
    context["errors"] = json!([message]);
    (StatusCode::UNPROCESSABLE_ENTITY, Json(context)).into_response()
}

async fn find_post(state: &GatewayState, id: i64) -> Result<Post, ApiError> {
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/posts",
    responses((status = 200, description = "All posts in storage order"))
)]
pub async fn list_posts(State(state): State<GatewayState>) -> Result<Response, ApiError> {
    let posts: Vec<PostResponse> = state
        .posts
        .list_all()
        .await?
        .into_iter()
        .map(PostResponse::from)
        .collect();

    Ok(Json(json!({ "template": "post_list", "posts": posts })).into_response())
}

#[utoipa::path(
    get,
    path = "/api/posts/new",
    responses(
        (status = 200, description = "Empty post form context"),
        (status = 401, description = "Not authenticated"),
    )
)]
pub async fn show_create(_current: CurrentUser) -> Json<serde_json::Value> {
    Json(post_form_context("create_post", &PostForm::default()))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    responses(
        (status = 303, description = "Post created, redirect to post list"),
        (status = 401, description = "Not authenticated"),
        (status = 422, description = "Form context with validation errors"),
    )
)]
pub async fn create_post(
    State(state): State<GatewayState>,
    current: CurrentUser,
    Json(form): Json<PostForm>,
) -> Result<Response, ApiError> {
    let context = post_form_context("create_post", &form);

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(error) => return Ok(validation_failure(context, &error.to_string())),
    };

    let content = expand_mentions(&state.users, &valid.content).await?;
    state
        .posts
        .create(
            current.user.id,
            &CreatePostRequest {
                title: valid.title,
                content,
            },
        )
        .await?;

    Ok(Redirect::to("/api/posts").into_response())
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post detail with author name"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn show_post(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let post = find_post(&state, id).await?;

    let author = state
        .users
        .find_by_id(post.author_id)
        .await?
        .ok_or_else(|| ApiError::InternalError("post author missing".to_string()))?;

    Ok(Json(json!({
        "template": "post_detail",
        "post": PostResponse::from(post),
        "author": author.full_name(),
    }))
    .into_response())
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/edit",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post form context pre-filled from the post"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn show_edit(
    State(state): State<GatewayState>,
    _current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let post = find_post(&state, id).await?;

    let mut context = post_form_context(
        "update_post",
        &PostForm {
            title: post.title,
            content: post.content,
        },
    );
    context["post_id"] = json!(id);

    Ok(Json(context).into_response())
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 303, description = "Post updated, redirect to its detail"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such post"),
        (status = 422, description = "Form context with validation errors"),
    )
)]
pub async fn update_post(
    State(state): State<GatewayState>,
    _current: CurrentUser,
    Path(id): Path<i64>,
    Json(form): Json<PostForm>,
) -> Result<Response, ApiError> {
    let context = post_form_context("update_post", &form);

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(error) => return Ok(validation_failure(context, &error.to_string())),
    };

    let content = expand_mentions(&state.users, &valid.content).await?;
    state
        .posts
        .update(
            id,
            &UpdatePostRequest {
                title: valid.title,
                content,
            },
        )
        .await?;

    Ok(Redirect::to(&format!("/api/posts/{id}")).into_response())
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}/delete",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 200, description = "Deletion confirmation context"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn show_delete(
    State(state): State<GatewayState>,
    _current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let post = find_post(&state, id).await?;

    Ok(Json(json!({
        "template": "delete_post",
        "post": PostResponse::from(post),
    }))
    .into_response())
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = i64, Path, description = "Post id")),
    responses(
        (status = 303, description = "Post deleted, redirect to post list"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No such post"),
    )
)]
pub async fn delete_post(
    State(state): State<GatewayState>,
    _current: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state.posts.delete(id).await?;
    Ok(Redirect::to("/api/posts").into_response())
}
