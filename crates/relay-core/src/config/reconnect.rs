//! Client-side reconnection configuration.

use serde::{Deserialize, Serialize};

/// Exponential backoff settings for the client reconnection controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    /// Base retry delay in milliseconds.
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,
    /// Maximum retry delay in milliseconds (backoff ceiling).
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    /// Maximum consecutive reconnection attempts before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_base_delay() -> u64 {
    1000
}

fn default_max_delay() -> u64 {
    30000
}

fn default_max_attempts() -> u32 {
    5
}
