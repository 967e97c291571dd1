//! # Minipress Gateway Crate
//!
//! The HTTP surface of the blog backend: an axum router over the shared
//! [`GatewayState`], REST handlers for auth, posts, and user lookup, and
//! a bearer-token [`CurrentUser`] extractor for the protected routes.
//! Debug builds additionally serve Swagger UI from the OpenAPI document.

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use middleware::CurrentUser;
pub use state::GatewayState;

use axum::{http::Method, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    let router = Router::new()
        .merge(rest::create_rest_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Swagger UI only in debug builds
    #[cfg(debug_assertions)]
    let router = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            paths(
                rest::health::health,
                rest::auth::show_register,
                rest::auth::register,
                rest::auth::show_login,
                rest::auth::login,
                rest::auth::logout,
                rest::posts::list_posts,
                rest::posts::show_create,
                rest::posts::create_post,
                rest::posts::show_post,
                rest::posts::show_edit,
                rest::posts::update_post,
                rest::posts::show_delete,
                rest::posts::delete_post,
                rest::users::lookup_users,
            ),
            components(schemas(rest::posts::PostResponse, rest::users::LookupRequest)),
            tags(
                (name = "minipress", description = "Minimal blog platform API")
            )
        )]
        struct ApiDoc;

        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    };

    router
}
