//! REST API endpoints for the gateway

pub mod auth;
pub mod health;
pub mod posts;
pub mod users;

use axum::Router;

use crate::state::GatewayState;

/// Create all REST API routes
pub fn create_rest_routes() -> Router<GatewayState> {
    Router::new()
        .merge(health::create_health_routes())
        .merge(auth::create_auth_routes())
        .merge(posts::create_post_routes())
        .merge(users::create_user_routes())
}
