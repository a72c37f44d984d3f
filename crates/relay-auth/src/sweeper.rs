//! Periodic background sweep of expired revocation records and stale
//! rate-limit buckets.
//!
//! The sweeper is the only writer that removes expired entries wholesale;
//! verify/check readers tolerate a concurrent sweep because every bucket
//! and record is touched under its own map entry lock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use relay_core::config::auth::AuthConfig;

use crate::rate_limit::SlidingWindowLimiter;
use crate::token::revocation::RevocationList;

/// Background garbage collector for auth state.
pub struct Sweeper {
    revocations: Arc<RevocationList>,
    rate_limiter: Arc<SlidingWindowLimiter>,
    interval: Duration,
}

impl std::fmt::Debug for Sweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweeper")
            .field("interval", &self.interval)
            .finish()
    }
}

impl Sweeper {
    /// Creates a sweeper over the given auth state.
    pub fn new(
        config: &AuthConfig,
        revocations: Arc<RevocationList>,
        rate_limiter: Arc<SlidingWindowLimiter>,
    ) -> Self {
        Self {
            revocations,
            rate_limiter,
            interval: Duration::from_secs(config.sweep_interval_seconds),
        }
    }

    /// Runs the sweep loop until the shutdown channel fires.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick fires immediately; skip it so a fresh process
        // does not sweep empty maps.
        ticker.tick().await;

        info!(interval_seconds = self.interval.as_secs(), "Auth sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once();
                }
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Auth sweeper stopped");
    }

    /// Performs a single sweep cycle.
    pub fn sweep_once(&self) {
        let revoked = self.revocations.sweep_expired();
        let buckets = self.rate_limiter.sweep();
        debug!(revoked, buckets, "Auth sweep cycle complete");
    }
}
