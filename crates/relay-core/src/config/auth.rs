//! Authentication, revocation, and login rate-limit configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token TTL in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// Minimum password length for registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Sliding window length for login rate limiting, in seconds.
    #[serde(default = "default_rate_window")]
    pub rate_limit_window_seconds: u64,
    /// Maximum login attempts per origin within the window.
    #[serde(default = "default_rate_max")]
    pub rate_limit_max_attempts: usize,
    /// Interval between background sweeps of expired revocation records
    /// and stale rate-limit buckets, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl(),
            password_min_length: default_password_min(),
            rate_limit_window_seconds: default_rate_window(),
            rate_limit_max_attempts: default_rate_max(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl() -> u64 {
    24
}

fn default_password_min() -> usize {
    8
}

fn default_rate_window() -> u64 {
    60
}

fn default_rate_max() -> usize {
    10
}

fn default_sweep_interval() -> u64 {
    3600
}
