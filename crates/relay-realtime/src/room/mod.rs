//! Room membership index and broadcast fan-out.

pub mod broadcaster;
pub mod index;

pub use broadcaster::RoomBroadcaster;
pub use index::RoomIndex;
