//! Application state shared across all handlers.

use std::sync::Arc;

use relay_auth::directory::UserDirectory;
use relay_auth::rate_limit::SlidingWindowLimiter;
use relay_auth::token::issuer::TokenIssuer;
use relay_auth::token::revocation::RevocationList;
use relay_auth::token::verifier::TokenVerifier;
use relay_core::config::AppConfig;
use relay_realtime::engine::RelayEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// In-memory account store.
    pub directory: Arc<UserDirectory>,
    /// JWT issuer.
    pub issuer: Arc<TokenIssuer>,
    /// JWT verifier (revocation-aware).
    pub verifier: Arc<TokenVerifier>,
    /// Revoked-token list.
    pub revocations: Arc<RevocationList>,
    /// Login rate limiter.
    pub rate_limiter: Arc<SlidingWindowLimiter>,
    /// Real-time relay engine.
    pub engine: Arc<RelayEngine>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}

impl AppState {
    /// Wires the full dependency graph from configuration.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let revocations = Arc::new(RevocationList::new(&config.auth));
        let issuer = Arc::new(TokenIssuer::new(&config.auth));
        let verifier = Arc::new(TokenVerifier::new(&config.auth, Arc::clone(&revocations)));
        let rate_limiter = Arc::new(SlidingWindowLimiter::new(&config.auth));
        let directory = Arc::new(UserDirectory::new());
        let engine = Arc::new(RelayEngine::new(config.realtime.clone()));

        Self {
            config,
            directory,
            issuer,
            verifier,
            revocations,
            rate_limiter,
            engine,
        }
    }
}
