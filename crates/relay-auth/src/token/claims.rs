//! Token claims and the decoded identity handed to the relay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use relay_core::types::UserId;

/// Claims payload embedded in every relay token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: UserId,
    /// Username for display.
    pub username: String,
    /// Where the account came from (standard signup vs. federated login).
    pub source: UserSource,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Account origin tag carried through tokens and presence events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSource {
    /// Direct username/password signup.
    Standard,
    /// Account provisioned through an external identity provider.
    Federated,
}

impl std::fmt::Display for UserSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Federated => write!(f, "federated"),
        }
    }
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Returns the remaining TTL in seconds (0 if expired).
    pub fn remaining_ttl_seconds(&self) -> u64 {
        let remaining = self.exp - Utc::now().timestamp();
        if remaining > 0 { remaining as u64 } else { 0 }
    }
}

/// The immutable authenticated identity bound to a connection.
///
/// Produced by [`super::verifier::TokenVerifier::verify`] at handshake time
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque subject id.
    pub user_id: UserId,
    /// Display name.
    pub username: String,
    /// Account origin.
    pub source: UserSource,
    /// When the backing token was issued.
    pub issued_at: DateTime<Utc>,
    /// When the backing token expires.
    pub expires_at: DateTime<Utc>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
            source: claims.source,
            issued_at: DateTime::from_timestamp(claims.iat, 0).unwrap_or_else(Utc::now),
            expires_at: claims.expires_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_claims(exp_offset: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: UserId::new(),
            username: "alice".to_string(),
            source: UserSource::Standard,
            iat: now,
            exp: now + exp_offset,
        }
    }

    #[test]
    fn expiry_checks() {
        assert!(!make_claims(3600).is_expired());
        assert!(make_claims(-1).is_expired());
        assert_eq!(make_claims(-100).remaining_ttl_seconds(), 0);
    }

    #[test]
    fn identity_carries_claim_fields() {
        let claims = make_claims(3600);
        let identity = Identity::from(claims.clone());
        assert_eq!(identity.user_id, claims.sub);
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.source, UserSource::Standard);
        assert_eq!(identity.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserSource::Federated).unwrap(),
            "\"federated\""
        );
    }
}
