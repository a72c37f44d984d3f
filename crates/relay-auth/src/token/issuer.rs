//! Token creation with configurable signing secret and TTL.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use relay_core::config::auth::AuthConfig;
use relay_core::error::AppError;
use relay_core::result::AppResult;
use relay_core::types::UserId;

use super::claims::{Claims, UserSource};

/// Creates signed identity tokens.
///
/// Signing is pure: issuance has no side effects beyond the HMAC itself.
#[derive(Clone)]
pub struct TokenIssuer {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token TTL in hours.
    ttl_hours: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

impl TokenIssuer {
    /// Creates a new issuer from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_hours: config.token_ttl_hours as i64,
        }
    }

    /// Issues a signed token for the given identity claims.
    ///
    /// Expiry is issued-at plus the configured TTL (24h by default).
    pub fn issue(
        &self,
        user_id: UserId,
        username: &str,
        source: UserSource,
    ) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + chrono::Duration::hours(self.ttl_hours);

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            source,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
