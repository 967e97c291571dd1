//! Password and session authentication.
//!
//! The [`Authenticator`] owns credential verification and the session
//! lifecycle. Passwords are hashed with argon2 at registration and
//! verified at login; successful logins are handed a random bearer token
//! stored server-side with a TTL. Field-level form validation happens
//! upstream in the forms crate; this crate only decides whether the
//! submitted credentials are real.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use minipress_config::AuthConfig;
use minipress_database::{
    AuthSession, CreateSessionRequest, CreateUserRequest, SessionError, SessionRepository, User,
    UserError, UserRepository,
};
use rand::RngCore;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserExists,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("session not found")]
    SessionNotFound,
    #[error("session expired")]
    SessionExpired,
    #[error("invalid session token")]
    InvalidSession,
    #[error("database error: {0}")]
    Database(String),
    #[error("password hashing failed: {0}")]
    PasswordHash(argon2::password_hash::Error),
}

impl From<UserError> for AuthError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::UsernameAlreadyExists | UserError::EmailAlreadyExists => {
                AuthError::UserExists
            }
            UserError::UserNotFound => AuthError::InvalidCredentials,
            UserError::DatabaseError(message) => AuthError::Database(message),
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::SessionNotFound => AuthError::SessionNotFound,
            SessionError::DatabaseError(message) => AuthError::Database(message),
        }
    }
}

/// Everything needed to create an account. Arrives pre-validated from the
/// registration form.
#[derive(Debug, Clone)]
pub struct RegistrationData {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Clone)]
pub struct Authenticator {
    users: UserRepository,
    sessions: SessionRepository,
    session_ttl: Duration,
}

impl Authenticator {
    pub fn new(pool: SqlitePool, config: AuthConfig) -> Self {
        let session_ttl = Duration::seconds(config.session_ttl_seconds as i64);

        Self {
            users: UserRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool),
            session_ttl,
        }
    }

    /// Create a new account with an argon2-hashed password.
    pub async fn register(&self, data: &RegistrationData) -> Result<User, AuthError> {
        let password_hash = self
            .hash_password(&data.password)
            .map_err(AuthError::PasswordHash)?;

        let user = self
            .users
            .create(&CreateUserRequest {
                username: data.username.clone(),
                email: data.email.clone(),
                first_name: data.first_name.clone(),
                last_name: data.last_name.clone(),
                password_hash,
            })
            .await?;

        info!(user = %user.public_id, username = %user.username, "registered new user");
        Ok(user)
    }

    /// Verify a username/password pair and issue a session on success.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(AuthSession, User), AuthError> {
        let Some(credentials) = self.users.credentials_by_username(username).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        let stored_hash = PasswordHash::new(&credentials.password_hash)
            .map_err(AuthError::PasswordHash)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &stored_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .find_by_id(credentials.user_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let session = self.issue_session(user.id).await?;
        info!(user = %user.public_id, "user logged in");
        Ok((session, user))
    }

    /// Resolve a bearer token to its session and user. Expired sessions
    /// are removed on sight.
    pub async fn validate_token(&self, token: &str) -> Result<(AuthSession, User), AuthError> {
        let Some(session) = self.sessions.find_by_token(token).await? else {
            return Err(AuthError::SessionNotFound);
        };

        let expires_at = DateTime::parse_from_rfc3339(&session.expires_at)
            .map_err(|_| AuthError::InvalidSession)?
            .with_timezone(&Utc);

        if expires_at <= Utc::now() {
            self.sessions.delete_by_token(token).await?;
            return Err(AuthError::SessionExpired);
        }

        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        Ok((session, user))
    }

    /// Clear the session behind a bearer token.
    pub async fn clear_session(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.delete_by_token(token).await?;
        info!("session cleared");
        Ok(())
    }

    async fn issue_session(&self, user_id: i64) -> Result<AuthSession, AuthError> {
        let token = self.generate_session_token();
        let expires_at = (Utc::now() + self.session_ttl).to_rfc3339();

        let session = self
            .sessions
            .create(&CreateSessionRequest {
                user_id,
                token,
                expires_at,
            })
            .await?;

        Ok(session)
    }

    fn hash_password(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn generate_session_token(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
