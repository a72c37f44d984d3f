//! # relay-client
//!
//! Client-side session maintenance for Orbit Relay: a reconnection
//! controller that re-establishes the WebSocket transport after loss,
//! with bounded exponential backoff and a terminal give-up state.

pub mod backoff;
pub mod connector;
pub mod controller;
pub mod state;

pub use backoff::BackoffPolicy;
pub use connector::{Connector, Transport, WsConnector};
pub use controller::ReconnectController;
pub use state::ClientState;
