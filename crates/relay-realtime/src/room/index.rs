//! Room membership index.
//!
//! Maintains the name → member-set mapping together with a reverse
//! connection → room mapping. Invariant: a connection id appears in at
//! most one room's set at any time. Rooms are created implicitly on
//! first join and their index entry is removed once the set drains.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::connection::handle::ConnectionId;

/// Name → member-set room index with a reverse lookup.
#[derive(Debug, Default)]
pub struct RoomIndex {
    /// Room name → set of member connection ids.
    members: DashMap<String, HashSet<ConnectionId>>,
    /// Connection id → current room name.
    current: DashMap<ConnectionId, String>,
}

impl RoomIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a connection to a room, migrating it out of its previous
    /// room if any. Returns the previous room name.
    ///
    /// Room membership is single-writer per connection, so two `bind`
    /// calls for the same id never race; concurrent joiners of the same
    /// room are serialized by the member-set entry lock.
    pub fn bind(&self, conn_id: ConnectionId, room: &str) -> Option<String> {
        let previous = self.current.insert(conn_id, room.to_string());

        if let Some(prev) = previous.as_deref() {
            self.remove_member(prev, conn_id);
        }
        self.members
            .entry(room.to_string())
            .or_default()
            .insert(conn_id);

        previous
    }

    /// Unbinds a connection from its current room, if any. Returns the
    /// room it was in.
    pub fn unbind(&self, conn_id: ConnectionId) -> Option<String> {
        let (_, room) = self.current.remove(&conn_id)?;
        self.remove_member(&room, conn_id);
        Some(room)
    }

    /// Returns the room a connection is currently bound to.
    pub fn room_of(&self, conn_id: ConnectionId) -> Option<String> {
        self.current.get(&conn_id).map(|r| r.clone())
    }

    /// Returns a snapshot of a room's member ids.
    pub fn members_of(&self, room: &str) -> Vec<ConnectionId> {
        self.members
            .get(room)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the member count of a room.
    pub fn member_count(&self, room: &str) -> usize {
        self.members.get(room).map(|set| set.len()).unwrap_or(0)
    }

    /// Returns the number of non-empty rooms.
    pub fn room_count(&self) -> usize {
        self.members.len()
    }

    /// Returns the names of all non-empty rooms.
    pub fn room_names(&self) -> Vec<String> {
        self.members.iter().map(|e| e.key().clone()).collect()
    }

    fn remove_member(&self, room: &str, conn_id: ConnectionId) {
        if let Some(mut set) = self.members.get_mut(room) {
            set.remove(&conn_id);
            if set.is_empty() {
                drop(set);
                // A joiner may have slipped in after the lock was
                // released; re-check emptiness under the entry lock.
                self.members.remove_if(room, |_, set| set.is_empty());
            }
        }
    }
}
