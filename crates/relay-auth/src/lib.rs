//! # relay-auth
//!
//! Authentication for Orbit Relay. Provides:
//!
//! - Token issuance and verification (HS256) with a distinct failure
//!   taxonomy (invalid / expired / revoked)
//! - A self-cleaning revocation list keyed by token signature
//! - A sliding-window login rate limiter
//! - Argon2id password hashing with an in-memory user directory
//! - A background sweeper that garbage-collects expired revocation
//!   records and stale rate-limit buckets

pub mod directory;
pub mod password;
pub mod rate_limit;
pub mod sweeper;
pub mod token;

pub use directory::UserDirectory;
pub use rate_limit::SlidingWindowLimiter;
pub use token::claims::{Claims, Identity, UserSource};
pub use token::issuer::TokenIssuer;
pub use token::revocation::RevocationList;
pub use token::verifier::TokenVerifier;
