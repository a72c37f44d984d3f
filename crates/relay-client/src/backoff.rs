//! Bounded exponential backoff schedule.

use std::time::Duration;

use relay_core::config::reconnect::ReconnectConfig;

/// Computes retry delays: `min(cap, base * 2^attempt)`.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    base: Duration,
    cap: Duration,
}

impl BackoffPolicy {
    /// Creates a policy from configuration.
    pub fn new(config: &ReconnectConfig) -> Self {
        Self {
            base: Duration::from_millis(config.base_delay_ms),
            cap: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Returns the delay before retry number `attempt` (zero-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        // Saturate the shift so large attempt counts stay at the cap
        // instead of overflowing.
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let millis = (self.base.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(millis).min(self.cap)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(&ReconnectConfig::default())
    }
}
