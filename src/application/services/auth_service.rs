//! Bearer-token authentication for the admin coupon API.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 of `token` under `signing_secret`, lowercase hex (64 chars).
///
/// The server and the admin CLI must share `TOKEN_SIGNING_SECRET`, since the
/// CLI stores exactly this digest when it issues a token.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Resolves a raw bearer value to the back-office credential it belongs to.
///
/// Only digests are stored, so a leaked `api_tokens` table is useless
/// without the signing secret.
pub struct AuthService<R: TokenRepository> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository> AuthService<R> {
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Returns the active token matching `raw`, after stamping its last use.
    ///
    /// Failing to stamp `last_used_at` is logged and does not reject the
    /// request.
    ///
    /// # Errors
    ///
    /// - unauthorized if no active token matches (unknown or revoked)
    /// - internal on database errors during the lookup
    pub async fn authenticate(&self, raw: &str) -> Result<ApiToken, AppError> {
        let digest = hash_token(&self.signing_secret, raw);

        let Some(token) = self.repository.find_active(&digest).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "unknown_or_revoked_token" }),
            ));
        };

        if let Err(e) = self.repository.update_last_used(token.id).await {
            tracing::warn!(token_id = token.id, error = %e, "Failed to record token use");
        }

        Ok(token)
    }
}
