//! Real-time relay engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Internal per-connection outbound buffer size.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer_size: usize,
    /// Heartbeat ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Maximum room name length in characters.
    #[serde(default = "default_max_room_name")]
    pub max_room_name_chars: usize,
    /// Maximum chat message content size in bytes.
    #[serde(default = "default_max_content")]
    pub max_content_bytes: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_buffer_size: default_outbound_buffer(),
            ping_interval_seconds: default_ping_interval(),
            max_room_name_chars: default_max_room_name(),
            max_content_bytes: default_max_content(),
        }
    }
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_ping_interval() -> u64 {
    30
}

fn default_max_room_name() -> usize {
    50
}

fn default_max_content() -> usize {
    1000
}
