//! Self-cleaning revocation list keyed by token signature.
//!
//! A revoked token fails verification immediately, regardless of its
//! cryptographic validity, until its natural expiry passes — at which
//! point the record is garbage-collected by the background sweeper.

use chrono::Utc;
use dashmap::DashMap;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::{debug, info};

use relay_core::config::auth::AuthConfig;
use relay_core::error::AppError;
use relay_core::result::AppResult;

use super::claims::Claims;
use super::signature_segment;

/// In-memory revocation records: token signature → expiry (epoch seconds).
pub struct RevocationList {
    /// Signature segment → recorded expiry.
    records: DashMap<String, i64>,
    /// Key for decoding the expiry claim at revocation time.
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for RevocationList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevocationList")
            .field("records", &self.records.len())
            .finish()
    }
}

impl RevocationList {
    /// Creates an empty revocation list.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            records: DashMap::new(),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Revokes a token.
    ///
    /// The expiry claim is decoded without enforcing the validity window,
    /// so an already-expired token can still be revoked harmlessly. The
    /// record is keyed by the token's signature segment and carries the
    /// original expiry so it can self-expire.
    pub fn revoke(&self, token: &str) -> AppResult<()> {
        let signature = signature_segment(token)
            .ok_or_else(|| AppError::auth_invalid("Malformed token"))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::auth_invalid(format!("Cannot revoke token: {e}")))?;

        self.records.insert(signature.to_string(), data.claims.exp);
        info!(user_id = %data.claims.sub, "Token revoked");
        Ok(())
    }

    /// Checks whether the given token's signature is currently revoked.
    ///
    /// A record past its expiry no longer counts as revoked even if the
    /// sweeper has not collected it yet.
    pub fn is_revoked(&self, token: &str) -> bool {
        let Some(signature) = signature_segment(token) else {
            return false;
        };
        match self.records.get(signature) {
            Some(exp) => *exp > Utc::now().timestamp(),
            None => false,
        }
    }

    /// Removes all records whose expiry has passed. Returns the number
    /// of records collected.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now().timestamp();
        let before = self.records.len();
        self.records.retain(|_, exp| *exp > now);
        let removed = before - self.records.len();
        if removed > 0 {
            debug!(removed, "Swept expired revocation records");
        }
        removed
    }

    /// Returns the number of live revocation records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
