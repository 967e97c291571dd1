//! Registration, login, and logout endpoints.
//!
//! GET handlers hand back the render context for the matching form as
//! JSON; the actual markup lives with the frontend. Submissions answer
//! with a 303 redirect on success and re-render the form context with
//! errors attached on failure.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use minipress_auth::{AuthError, RegistrationData};
use minipress_forms::{LoginForm, RegistrationForm};
use serde_json::json;

use crate::error::ApiError;
use crate::middleware::bearer_token;
use crate::state::GatewayState;

pub fn create_auth_routes() -> Router<GatewayState> {
    Router::new()
        .route("/api/auth/register", get(show_register).post(register))
        .route("/api/auth/login", get(show_login).post(login))
        .route("/api/auth/logout", post(logout))
}

// Password inputs are never echoed back into a re-rendered form.
fn registration_context(form: &RegistrationForm) -> serde_json::Value {
    json!({
        "template": "register",
        "form": {
            "username": form.username,
            "email": form.email,
            "first_name": form.first_name,
            "last_name": form.last_name,
            "password": "",
            "confirm_password": "",
        },
    })
}

fn login_context(form: &LoginForm) -> serde_json::Value {
    json!({
        "template": "login",
        "form": {
            "username": form.username,
            "password": "",
        },
    })
}

fn annotate_errors(mut context: serde_json::Value, message: &str) -> serde_json::Value {
    context["errors"] = json!([message]);
    context
}

#[utoipa::path(
    get,
    path = "/api/auth/register",
    responses((status = 200, description = "Empty registration form context"))
)]
pub async fn show_register() -> Json<serde_json::Value> {
    Json(registration_context(&RegistrationForm::default()))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    responses(
        (status = 303, description = "Account created, redirect to login"),
        (status = 400, description = "Username or email already taken"),
        (status = 422, description = "Form context with validation errors"),
    )
)]
pub async fn register(
    State(state): State<GatewayState>,
    Json(form): Json<RegistrationForm>,
) -> Result<Response, ApiError> {
    let context = registration_context(&form);

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(error) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(annotate_errors(context, &error.to_string())),
            )
                .into_response())
        }
    };

    state
        .authenticator
        .register(&RegistrationData {
            username: valid.username,
            email: valid.email,
            first_name: valid.first_name,
            last_name: valid.last_name,
            password: valid.password,
        })
        .await?;

    Ok(Redirect::to("/api/auth/login").into_response())
}

#[utoipa::path(
    get,
    path = "/api/auth/login",
    responses((status = 200, description = "Empty login form context"))
)]
pub async fn show_login() -> Json<serde_json::Value> {
    Json(login_context(&LoginForm::default()))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 303, description = "Session issued via x-session-token, redirect to post list"),
        (status = 401, description = "Form context with a credential error"),
        (status = 422, description = "Form context with validation errors"),
    )
)]
pub async fn login(
    State(state): State<GatewayState>,
    Json(form): Json<LoginForm>,
) -> Result<Response, ApiError> {
    let context = login_context(&form);

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(error) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(annotate_errors(context, &error.to_string())),
            )
                .into_response())
        }
    };

    match state
        .authenticator
        .authenticate(&valid.username, &valid.password)
        .await
    {
        Ok((session, _user)) => Ok((
            AppendHeaders([("x-session-token", session.token)]),
            Redirect::to("/api/posts"),
        )
            .into_response()),
        Err(AuthError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            Json(annotate_errors(context, "invalid credentials")),
        )
            .into_response()),
        Err(error) => Err(error.into()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 303, description = "Session cleared, redirect to post list"))
)]
pub async fn logout(
    State(state): State<GatewayState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    // Logging out without a live session is not an error.
    if let Some(token) = bearer_token(&headers) {
        match state.authenticator.clear_session(&token).await {
            Ok(()) | Err(AuthError::SessionNotFound) => {}
            Err(error) => return Err(error.into()),
        }
    }

    Ok(Redirect::to("/api/posts").into_response())
}
