//! Token issuance, verification, claims, and revocation.

pub mod claims;
pub mod issuer;
pub mod revocation;
pub mod verifier;

pub use claims::{Claims, Identity, UserSource};
pub use issuer::TokenIssuer;
pub use revocation::RevocationList;
pub use verifier::TokenVerifier;

/// Returns the signature segment (third dot-separated part) of a compact
/// JWT, used as the revocation key.
pub(crate) fn signature_segment(token: &str) -> Option<&str> {
    let mut parts = token.split('.');
    let _header = parts.next()?;
    let _payload = parts.next()?;
    let signature = parts.next()?;
    if parts.next().is_some() || signature.is_empty() {
        return None;
    }
    Some(signature)
}
