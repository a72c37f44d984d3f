//! Sliding-window login rate limiter.
//!
//! Bounds repeated authentication attempts per (origin, endpoint) within a
//! trailing window. Consulted by the HTTP login path before the token
//! authority is ever invoked; never consulted mid-session.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, warn};

use relay_core::config::auth::AuthConfig;

/// Per-key ordered attempt timestamps within a fixed trailing window.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    /// (origin, endpoint) → attempt timestamps, oldest first.
    buckets: DashMap<(String, String), Vec<Instant>>,
    /// Window length.
    window: Duration,
    /// Maximum admitted attempts within the window.
    max_attempts: usize,
}

impl SlidingWindowLimiter {
    /// Creates a limiter from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            window: Duration::from_secs(config.rate_limit_window_seconds),
            max_attempts: config.rate_limit_max_attempts,
        }
    }

    /// Records an attempt for the key and reports whether it is admitted.
    ///
    /// An attempt is admitted only while the count within the trailing
    /// window is below the threshold. Rejected attempts are not recorded,
    /// so a client cannot extend its own lockout by retrying.
    pub fn check(&self, origin: &str, endpoint: &str) -> bool {
        self.check_at(origin, endpoint, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit current time.
    pub fn check_at(&self, origin: &str, endpoint: &str, now: Instant) -> bool {
        let key = (origin.to_string(), endpoint.to_string());
        let mut bucket = self.buckets.entry(key).or_default();

        let cutoff = now.checked_sub(self.window);
        if let Some(cutoff) = cutoff {
            bucket.retain(|t| *t > cutoff);
        }

        if bucket.len() >= self.max_attempts {
            warn!(origin, endpoint, "Rate limit exceeded");
            return false;
        }

        bucket.push(now);
        true
    }

    /// Drops buckets whose newest attempt fell out of the window.
    ///
    /// This is the only writer that removes whole buckets; `check` readers
    /// tolerate a concurrent sweep because each bucket is touched under its
    /// own map entry lock.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    /// Same as [`sweep`](Self::sweep) with an explicit current time.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.buckets.len();
        if let Some(cutoff) = now.checked_sub(self.window) {
            self.buckets
                .retain(|_, attempts| attempts.iter().any(|t| *t > cutoff));
        }
        let removed = before - self.buckets.len();
        if removed > 0 {
            debug!(removed, "Swept stale rate-limit buckets");
        }
        removed
    }

    /// Returns the number of live buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_limiter(max_attempts: usize, window_seconds: u64) -> SlidingWindowLimiter {
        let config = AuthConfig {
            rate_limit_max_attempts: max_attempts,
            rate_limit_window_seconds: window_seconds,
            ..AuthConfig::default()
        };
        SlidingWindowLimiter::new(&config)
    }

    #[test]
    fn admits_up_to_threshold_then_rejects() {
        let limiter = make_limiter(3, 60);
        let now = Instant::now();
        assert!(limiter.check_at("10.0.0.1", "login", now));
        assert!(limiter.check_at("10.0.0.1", "login", now));
        assert!(limiter.check_at("10.0.0.1", "login", now));
        assert!(!limiter.check_at("10.0.0.1", "login", now));
    }

    #[test]
    fn origins_are_isolated() {
        let limiter = make_limiter(1, 60);
        let now = Instant::now();
        assert!(limiter.check_at("10.0.0.1", "login", now));
        assert!(!limiter.check_at("10.0.0.1", "login", now));
        assert!(limiter.check_at("10.0.0.2", "login", now));
    }

    #[test]
    fn window_slides() {
        let limiter = make_limiter(2, 10);
        let start = Instant::now() + Duration::from_secs(100);
        assert!(limiter.check_at("o", "login", start));
        assert!(limiter.check_at("o", "login", start));
        assert!(!limiter.check_at("o", "login", start + Duration::from_secs(5)));
        // Both earlier attempts have aged out of the trailing window.
        assert!(limiter.check_at("o", "login", start + Duration::from_secs(11)));
    }

    #[test]
    fn sweep_drops_stale_buckets_only() {
        let limiter = make_limiter(5, 10);
        let start = Instant::now() + Duration::from_secs(100);
        limiter.check_at("stale", "login", start);
        limiter.check_at("fresh", "login", start + Duration::from_secs(20));

        assert_eq!(limiter.sweep_at(start + Duration::from_secs(25)), 1);
        assert_eq!(limiter.bucket_count(), 1);
    }
}
