//! Liveness endpoint

use axum::{routing::get, Json, Router};
use serde_json::json;

use crate::state::GatewayState;

pub fn create_health_routes() -> Router<GatewayState> {
    Router::new().route("/api/health", get(health))
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is alive"))
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
