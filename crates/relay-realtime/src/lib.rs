//! # relay-realtime
//!
//! Real-time relay engine for Orbit Relay. Provides:
//!
//! - The connection registry binding live transports to authenticated
//!   identities and their current room
//! - Room membership index with an at-most-one-room-per-connection
//!   invariant
//! - Best-effort room broadcast fan-out
//! - Per-connection heartbeat liveness monitoring with eviction
//! - The typed wire event schema and its validation rules

pub mod connection;
pub mod engine;
pub mod event;
pub mod room;

pub use connection::handle::{ConnectionHandle, ConnectionId};
pub use connection::registry::ConnectionRegistry;
pub use engine::RelayEngine;
pub use event::types::{InboundEvent, OutboundEvent};
pub use room::broadcaster::RoomBroadcaster;
pub use room::index::RoomIndex;
