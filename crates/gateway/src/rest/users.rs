//! User lookup endpoint.
//!
//! Frontends probe this while composing a post to learn which `@username`
//! candidates will actually expand.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::GatewayState;

pub fn create_user_routes() -> Router<GatewayState> {
    Router::new().route("/api/users/lookup", post(lookup_users))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LookupRequest {
    pub usernames: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/users/lookup",
    request_body = LookupRequest,
    responses(
        (status = 200, description = "The subset of requested usernames that exist"),
        (status = 400, description = "Malformed request body"),
    )
)]
pub async fn lookup_users(
    State(state): State<GatewayState>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;

    let users = state.users.find_existing_usernames(&request.usernames).await?;

    Ok(Json(json!({ "users": users })))
}
