//! Repository trait for admin token authentication.

use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Admin API token with metadata.
///
/// Only the HMAC-SHA256 hash of the token is stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiToken {
    pub id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ApiToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// How the admin CLI identifies a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLookup {
    Id(i64),
    Name(String),
}

impl TokenLookup {
    /// Numeric input is treated as an id, anything else as a name.
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<i64>() {
            Ok(id) => TokenLookup::Id(id),
            Err(_) => TokenLookup::Name(input.trim().to_string()),
        }
    }
}

/// Repository interface for admin API tokens.
///
/// Callers hash tokens before they reach the repository, so raw tokens are
/// never persisted or compared here.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// The non-revoked token whose hash is `token_hash`, if any.
    ///
    /// # Errors
    ///
    /// Returns an internal [`AppError`] on database errors.
    async fn find_active(&self, token_hash: &str) -> Result<Option<ApiToken>, AppError>;

    /// Stamps `last_used_at` on a token that is still active.
    ///
    /// # Errors
    ///
    /// Returns an internal [`AppError`] on database errors.
    async fn update_last_used(&self, id: i64) -> Result<(), AppError>;

    /// Stores a new token.
    ///
    /// # Errors
    ///
    /// Returns a conflict [`AppError`] if the name or hash is already taken.
    /// Returns an internal [`AppError`] on database errors.
    async fn create_token(&self, name: &str, token_hash: &str) -> Result<ApiToken, AppError>;

    /// Lists all tokens, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an internal [`AppError`] on database errors.
    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError>;

    /// Finds a token by id or name.
    ///
    /// # Errors
    ///
    /// Returns an internal [`AppError`] on database errors.
    async fn find(&self, lookup: TokenLookup) -> Result<Option<ApiToken>, AppError>;

    /// Revokes a token so it can no longer authenticate.
    ///
    /// # Errors
    ///
    /// Returns a not-found [`AppError`] if no active token has this id.
    /// Returns an internal [`AppError`] on database errors.
    async fn revoke_token(&self, id: i64) -> Result<(), AppError>;
}
