//! Best-effort room broadcast fan-out.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::event::types::OutboundEvent;

use super::index::RoomIndex;

/// Fans an event out to every member of a room, excluding an optional
/// sender.
///
/// Delivery is O(N) sequential, non-blocking, and best-effort: a closed
/// or saturated peer is skipped and logged, never retried, and never
/// stalls the remaining recipients.
#[derive(Debug, Clone)]
pub struct RoomBroadcaster {
    connections: Arc<DashMap<ConnectionId, Arc<ConnectionHandle>>>,
    rooms: Arc<RoomIndex>,
}

impl RoomBroadcaster {
    /// Creates a broadcaster over the shared connection and room maps.
    pub fn new(
        connections: Arc<DashMap<ConnectionId, Arc<ConnectionHandle>>>,
        rooms: Arc<RoomIndex>,
    ) -> Self {
        Self { connections, rooms }
    }

    /// Sends the event to every current member of `room` except
    /// `exclude`. Returns the number of successful deliveries.
    pub fn broadcast(
        &self,
        room: &str,
        event: &OutboundEvent,
        exclude: Option<ConnectionId>,
    ) -> usize {
        let mut delivered = 0;
        for conn_id in self.rooms.members_of(room) {
            if Some(conn_id) == exclude {
                continue;
            }
            let Some(handle) = self.connections.get(&conn_id) else {
                continue;
            };
            if handle.send(event.clone()) {
                delivered += 1;
            } else {
                debug!(conn_id = %conn_id, room, "Skipped unreachable room member");
            }
        }
        delivered
    }
}
