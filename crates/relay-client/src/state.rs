//! Client connection state machine.

use std::fmt;

/// Observable state of the reconnection controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientState {
    /// No transport; a retry may be pending.
    Disconnected,
    /// A connection attempt is in flight.
    Connecting,
    /// The transport is established and being driven.
    Connected,
    /// Terminal: retry budget exhausted, no further automatic attempts.
    GaveUp {
        /// User-visible explanation.
        message: String,
    },
}

impl ClientState {
    /// True for the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GaveUp { .. })
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::GaveUp { .. } => write!(f, "gave_up"),
        }
    }
}
