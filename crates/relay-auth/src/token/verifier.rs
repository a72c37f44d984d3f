//! Token verification with a distinct failure taxonomy.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use relay_core::config::auth::AuthConfig;
use relay_core::error::AppError;
use relay_core::result::AppResult;

use super::claims::{Claims, Identity};
use super::revocation::RevocationList;

/// Validates tokens and checks revocation status.
///
/// Verification order: signature and expiry first, then the revocation
/// list. `AuthExpired` is signalled distinctly from `AuthInvalid`
/// (malformed/forged) and `AuthRevoked`.
#[derive(Clone)]
pub struct TokenVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Revocation records.
    revocations: Arc<RevocationList>,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig, revocations: Arc<RevocationList>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            revocations,
        }
    }

    /// Decodes and validates a token string, returning the identity it
    /// carries.
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::auth_expired("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::auth_invalid("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::auth_invalid("Invalid token signature")
                    }
                    _ => AppError::auth_invalid(format!("Token validation failed: {e}")),
                }
            })?;

        if self.revocations.is_revoked(token) {
            return Err(AppError::auth_revoked("Token has been revoked"));
        }

        Ok(Identity::from(token_data.claims))
    }
}
