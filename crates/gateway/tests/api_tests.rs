//! End-to-end tests for the REST surface, driven through the router with
//! `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use minipress_config::AppConfig;
use minipress_database::run_migrations;
use minipress_gateway::{create_router, GatewayState};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

struct TestContext {
    app: axum::Router,
}

impl TestContext {
    async fn new() -> Self {
        // A single pooled connection keeps every query on the same
        // in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory database should open");

        run_migrations(&pool).await.expect("migrations should apply");

        let state = GatewayState::new(pool, &AppConfig::default());

        Self {
            app: create_router(state),
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request should build"),
            None => builder.body(Body::empty()).expect("request should build"),
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router should answer");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, headers, value)
    }
}

async fn register(ctx: &TestContext, username: &str, first_name: &str, last_name: &str) {
    let (status, _, _) = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "first_name": first_name,
                "last_name": last_name,
                "password": "secret",
                "confirm_password": "secret",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

async fn login(ctx: &TestContext, username: &str) -> String {
    let (status, headers, _) = ctx
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": "secret" })),
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    headers
        .get("x-session-token")
        .expect("login should hand out a session token")
        .to_str()
        .expect("token should be ascii")
        .to_string()
}

#[tokio::test]
async fn health_endpoint_answers() {
    let ctx = TestContext::new().await;

    let (status, _, body) = ctx.send(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_redirects_to_login() {
    let ctx = TestContext::new().await;

    let (status, headers, _) = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "jane",
                "email": "jane@example.com",
                "first_name": "Jane",
                "last_name": "Doe",
                "password": "secret",
                "confirm_password": "secret",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/auth/login");
}

#[tokio::test]
async fn register_rejects_password_mismatch() {
    let ctx = TestContext::new().await;

    let (status, _, body) = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "jane",
                "email": "jane@example.com",
                "first_name": "Jane",
                "last_name": "Doe",
                "password": "a",
                "confirm_password": "b",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["template"], "register");
    assert_eq!(body["errors"][0], "passwords do not match");
    // Submitted passwords are not echoed back.
    assert_eq!(body["form"]["password"], "");
}

#[tokio::test]
async fn register_reports_first_missing_field() {
    let ctx = TestContext::new().await;

    let (status, _, body) = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "jane",
                "email": "",
                "first_name": "",
                "last_name": "Doe",
                "password": "secret",
                "confirm_password": "secret",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0], "field 'email' is required");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let ctx = TestContext::new().await;
    register(&ctx, "jane", "Jane", "Doe").await;

    let (status, _, body) = ctx
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "jane",
                "email": "other@example.com",
                "first_name": "Jane",
                "last_name": "Other",
                "password": "secret",
                "confirm_password": "secret",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn login_with_wrong_password_re_renders_the_form() {
    let ctx = TestContext::new().await;
    register(&ctx, "jane", "Jane", "Doe").await;

    let (status, headers, body) = ctx
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "jane", "password": "wrong" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(headers.get("x-session-token").is_none());
    assert_eq!(body["template"], "login");
    assert_eq!(body["errors"][0], "invalid credentials");
}

#[tokio::test]
async fn login_with_unknown_user_looks_like_wrong_password() {
    let ctx = TestContext::new().await;

    let (status, _, body) = ctx
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "secret" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["errors"][0], "invalid credentials");
}

#[tokio::test]
async fn post_creation_requires_a_session() {
    let ctx = TestContext::new().await;

    let (status, _, _) = ctx
        .send(
            Method::POST,
            "/api/posts",
            None,
            Some(json!({ "title": "Hello", "content": "body" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_post_expands_known_mentions_only() {
    let ctx = TestContext::new().await;
    register(&ctx, "jane", "Jane", "Doe").await;
    register(&ctx, "bob", "Bob", "Stone").await;
    let token = login(&ctx, "bob").await;

    let (status, headers, _) = ctx
        .send(
            Method::POST,
            "/api/posts",
            Some(&token),
            Some(json!({ "title": "Hello", "content": "hi @jane and @ghost" })),
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/posts");

    let (status, _, body) = ctx.send(Method::GET, "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "post_list");
    assert_eq!(body["posts"][0]["content"], "hi Jane Doe and @ghost");

    let id = body["posts"][0]["id"].as_i64().unwrap();
    let (status, _, body) = ctx
        .send(Method::GET, &format!("/api/posts/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "post_detail");
    assert_eq!(body["author"], "Bob Stone");
}

#[tokio::test]
async fn post_validation_failure_keeps_the_submission() {
    let ctx = TestContext::new().await;
    register(&ctx, "bob", "Bob", "Stone").await;
    let token = login(&ctx, "bob").await;

    let (status, _, body) = ctx
        .send(
            Method::POST,
            "/api/posts",
            Some(&token),
            Some(json!({ "title": "", "content": "body" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["template"], "create_post");
    assert_eq!(body["form"]["content"], "body");
    assert_eq!(body["errors"][0], "field 'title' is required");
}

#[tokio::test]
async fn edit_form_is_prefilled_from_the_post() {
    let ctx = TestContext::new().await;
    register(&ctx, "bob", "Bob", "Stone").await;
    let token = login(&ctx, "bob").await;

    ctx.send(
        Method::POST,
        "/api/posts",
        Some(&token),
        Some(json!({ "title": "Hello", "content": "body" })),
    )
    .await;

    let (status, _, body) = ctx
        .send(Method::GET, "/api/posts/1/edit", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "update_post");
    assert_eq!(body["post_id"], 1);
    assert_eq!(body["form"]["title"], "Hello");
}

#[tokio::test]
async fn update_expands_mentions_and_redirects_to_detail() {
    let ctx = TestContext::new().await;
    register(&ctx, "jane", "Jane", "Doe").await;
    register(&ctx, "bob", "Bob", "Stone").await;
    let token = login(&ctx, "bob").await;

    ctx.send(
        Method::POST,
        "/api/posts",
        Some(&token),
        Some(json!({ "title": "Hello", "content": "body" })),
    )
    .await;

    let (status, headers, _) = ctx
        .send(
            Method::PUT,
            "/api/posts/1",
            Some(&token),
            Some(json!({ "title": "Hello again", "content": "cc @jane" })),
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/posts/1");

    let (_, _, body) = ctx.send(Method::GET, "/api/posts/1", None, None).await;
    assert_eq!(body["post"]["title"], "Hello again");
    assert_eq!(body["post"]["content"], "cc Jane Doe");
}

#[tokio::test]
async fn updating_a_missing_post_is_not_found() {
    let ctx = TestContext::new().await;
    register(&ctx, "bob", "Bob", "Stone").await;
    let token = login(&ctx, "bob").await;

    let (status, _, _) = ctx
        .send(
            Method::PUT,
            "/api/posts/99",
            Some(&token),
            Some(json!({ "title": "T", "content": "C" })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_post_detail_is_not_found() {
    let ctx = TestContext::new().await;
    register(&ctx, "bob", "Bob", "Stone").await;
    let token = login(&ctx, "bob").await;

    ctx.send(
        Method::POST,
        "/api/posts",
        Some(&token),
        Some(json!({ "title": "Hello", "content": "body" })),
    )
    .await;

    let (status, headers, _) = ctx
        .send(Method::DELETE, "/api/posts/1", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/posts");

    let (status, _, _) = ctx.send(Method::GET, "/api/posts/1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = ctx
        .send(Method::DELETE, "/api/posts/1", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn lookup_returns_the_existing_subset() {
    let ctx = TestContext::new().await;
    register(&ctx, "alice", "Alice", "Hart").await;

    let (status, _, body) = ctx
        .send(
            Method::POST,
            "/api/users/lookup",
            None,
            Some(json!({ "usernames": ["alice", "ghost"] })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], json!(["alice"]));
}

#[tokio::test]
async fn malformed_lookup_body_is_a_bad_request() {
    let ctx = TestContext::new().await;

    let (status, _, _) = ctx
        .send(
            Method::POST,
            "/api/users/lookup",
            None,
            Some(json!({ "usernames": "not-a-list" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let ctx = TestContext::new().await;
    register(&ctx, "bob", "Bob", "Stone").await;
    let token = login(&ctx, "bob").await;

    let (status, headers, _) = ctx
        .send(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/posts");

    let (status, _, _) = ctx
        .send(Method::GET, "/api/posts/new", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_a_session_still_redirects() {
    let ctx = TestContext::new().await;

    let (status, headers, _) = ctx
        .send(Method::POST, "/api/auth/logout", None, None)
        .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/api/posts");
}

#[tokio::test]
async fn form_contexts_are_served_for_get_requests() {
    let ctx = TestContext::new().await;
    register(&ctx, "bob", "Bob", "Stone").await;
    let token = login(&ctx, "bob").await;

    let (status, _, body) = ctx.send(Method::GET, "/api/auth/register", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "register");
    assert_eq!(body["form"]["username"], "");

    let (status, _, body) = ctx.send(Method::GET, "/api/auth/login", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "login");

    let (status, _, body) = ctx
        .send(Method::GET, "/api/posts/new", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["template"], "create_post");
}
