//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use minipress_auth::AuthError;
use minipress_database::{PostError, SessionError, UserError};
use serde_json::json;
use thiserror::Error;

/// Gateway error types, mapped onto HTTP status codes at the response
/// boundary. Form validation failures are not represented here; handlers
/// answer those with a re-rendered form context instead.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AuthenticationFailed(_) | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let error_response = json!({
            "error": status.as_str(),
            "message": self.to_string(),
        });

        (status, Json(error_response)).into_response()
    }
}

/// Result type for gateway operations
pub type ApiResult<T> = Result<T, ApiError>;

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::UserExists => ApiError::InvalidRequest("user already exists".to_string()),
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::SessionNotFound | AuthError::SessionExpired | AuthError::InvalidSession => {
                ApiError::AuthenticationFailed(error.to_string())
            }
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::PasswordHash(_) => ApiError::InternalError(error.to_string()),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::UserNotFound => ApiError::NotFound("User not found".to_string()),
            UserError::UsernameAlreadyExists | UserError::EmailAlreadyExists => {
                ApiError::InvalidRequest(error.to_string())
            }
            UserError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<PostError> for ApiError {
    fn from(error: PostError) -> Self {
        match error {
            PostError::PostNotFound => ApiError::NotFound("Post not found".to_string()),
            PostError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::SessionNotFound => {
                ApiError::AuthenticationFailed("session not found".to_string())
            }
            SessionError::DatabaseError(msg) => ApiError::DatabaseError(msg),
        }
    }
}
