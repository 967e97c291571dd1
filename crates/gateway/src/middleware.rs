//! Request authentication.
//!
//! Session context is explicit: protected handlers take a [`CurrentUser`]
//! extractor argument, which resolves the bearer token from the
//! `Authorization` header against the session store. Login hands the
//! token out, logout consumes it; no ambient session state exists.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use minipress_database::{AuthSession, User};

use crate::error::ApiError;
use crate::state::GatewayState;

/// The authenticated user behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: AuthSession,
}

/// Pull the token out of an `Authorization: Bearer …` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

#[async_trait]
impl FromRequestParts<GatewayState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &GatewayState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError::AuthenticationFailed("missing bearer token".to_string()))?;

        let (session, user) = state.authenticator.validate_token(&token).await?;

        Ok(CurrentUser { user, session })
    }
}
