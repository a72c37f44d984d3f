//! Connection lifecycle: handles, registry, and heartbeat.

pub mod handle;
pub mod heartbeat;
pub mod registry;

pub use handle::{ConnectionHandle, ConnectionId};
pub use registry::ConnectionRegistry;
