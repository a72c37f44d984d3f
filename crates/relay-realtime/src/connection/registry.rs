//! Connection registry — the authoritative map of live connections to
//! their authenticated identity and current room.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use relay_auth::token::claims::Identity;
use relay_core::config::realtime::RealtimeConfig;
use relay_core::error::{AppError, ErrorKind};
use relay_core::result::AppResult;
use relay_core::types::MessageId;

use crate::event::types::{InboundEvent, OutboundEvent};
use crate::event::validator::{validate_content, validate_room_name};
use crate::room::broadcaster::RoomBroadcaster;
use crate::room::index::RoomIndex;

use super::handle::{ConnectionHandle, ConnectionId};

/// Owns connection lifecycle, room membership mutation, and inbound
/// event dispatch.
#[derive(Debug)]
pub struct ConnectionRegistry {
    /// Connection id → handle.
    connections: Arc<DashMap<ConnectionId, Arc<ConnectionHandle>>>,
    /// Room membership index.
    rooms: Arc<RoomIndex>,
    /// Fan-out over the shared maps.
    broadcaster: RoomBroadcaster,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new(config: RealtimeConfig) -> Self {
        let connections = Arc::new(DashMap::new());
        let rooms = Arc::new(RoomIndex::new());
        let broadcaster = RoomBroadcaster::new(Arc::clone(&connections), Arc::clone(&rooms));
        Self {
            connections,
            rooms,
            broadcaster,
            config,
        }
    }

    /// Admits an authenticated transport.
    ///
    /// Allocates a connection entry with room unset, queues the one-time
    /// `connection` welcome event, and returns the handle plus the
    /// receiver the transport task drains. Concurrent sessions per
    /// identity are unbounded.
    pub fn admit(&self, identity: Identity) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundEvent>) {
        let (tx, rx) = mpsc::channel(self.config.outbound_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(identity, tx));

        self.connections.insert(handle.id, Arc::clone(&handle));
        handle.send(OutboundEvent::connection(handle.id, &handle.identity));

        info!(
            conn_id = %handle.id,
            user = %handle.identity.username,
            user_type = %handle.identity.source,
            "Connection admitted"
        );

        (handle, rx)
    }

    /// Moves a connection into a room.
    ///
    /// The name is validated first, so a rejected join never disturbs the
    /// current membership. A previous room gets `user_left` for its
    /// remaining members; the new room gets `user_joined` excluding the
    /// joiner, who receives a direct `room_joined` acknowledgment.
    pub fn join(&self, conn_id: ConnectionId, room: &str) -> AppResult<()> {
        let handle = self.get(conn_id)?;
        validate_room_name(room, &self.config)?;
        let room = room.trim();

        // On a same-room re-join the joiner is already back in the set
        // when the departure fans out, so it must be excluded.
        if let Some(previous) = self.rooms.bind(conn_id, room) {
            self.broadcaster.broadcast(
                &previous,
                &OutboundEvent::user_left(&handle.identity, &previous),
                Some(conn_id),
            );
        }

        self.broadcaster.broadcast(
            room,
            &OutboundEvent::user_joined(&handle.identity, room),
            Some(conn_id),
        );
        handle.send(OutboundEvent::room_joined(room));

        debug!(conn_id = %conn_id, room, "Joined room");
        Ok(())
    }

    /// Takes a connection out of its current room. No-op without one.
    pub fn leave(&self, conn_id: ConnectionId) -> AppResult<()> {
        let handle = self.get(conn_id)?;
        if let Some(room) = self.rooms.unbind(conn_id) {
            self.broadcaster.broadcast(
                &room,
                &OutboundEvent::user_left(&handle.identity, &room),
                None,
            );
            debug!(conn_id = %conn_id, room, "Left room");
        }
        Ok(())
    }

    /// Publishes chat content to the connection's current room.
    ///
    /// Fans out to every member **including the sender** (sender-echo),
    /// so the sender's UI does not have to render optimistically from
    /// client-only state.
    pub fn publish(&self, conn_id: ConnectionId, content: &str) -> AppResult<MessageId> {
        let handle = self.get(conn_id)?;
        let room = self
            .rooms
            .room_of(conn_id)
            .ok_or_else(|| AppError::not_in_room("You must join a room first"))?;
        let content = validate_content(content, &self.config)?;

        let message_id = MessageId::new();
        let event = OutboundEvent::Chat {
            message_id,
            sender: handle.identity.username.clone(),
            user_type: handle.identity.source,
            content,
            room: room.clone(),
            timestamp: chrono::Utc::now(),
        };

        let delivered = self.broadcaster.broadcast(&room, &event, None);
        debug!(conn_id = %conn_id, room, delivered, "Chat published");
        Ok(message_id)
    }

    /// Relays a typing indicator to the rest of the room. Silently
    /// ignored for a connection without a room.
    pub fn typing(&self, conn_id: ConnectionId, is_typing: bool) -> AppResult<()> {
        let handle = self.get(conn_id)?;
        let Some(room) = self.rooms.room_of(conn_id) else {
            return Ok(());
        };

        let event = OutboundEvent::Typing {
            user: handle.identity.username.clone(),
            user_type: handle.identity.source,
            is_typing,
            room: room.clone(),
            timestamp: chrono::Utc::now(),
        };
        self.broadcaster.broadcast(&room, &event, Some(conn_id));
        Ok(())
    }

    /// Destroys a connection entry: room teardown with `user_left`, then
    /// handle close. Idempotent — removing an already-removed id is a
    /// no-op.
    pub fn remove(&self, conn_id: ConnectionId) {
        let Some((_, handle)) = self.connections.remove(&conn_id) else {
            return;
        };

        if let Some(room) = self.rooms.unbind(conn_id) {
            self.broadcaster.broadcast(
                &room,
                &OutboundEvent::user_left(&handle.identity, &room),
                None,
            );
        }
        handle.mark_closed();

        info!(
            conn_id = %conn_id,
            user = %handle.identity.username,
            "Connection removed"
        );
    }

    /// Single dispatch point for a raw inbound frame.
    ///
    /// Post-admission failures are reported via an `error` event on the
    /// same connection; they never close the transport or affect other
    /// connections.
    pub fn handle_inbound(&self, conn_id: ConnectionId, raw: &str) {
        let event = match serde_json::from_str::<InboundEvent>(raw) {
            Ok(event) => event,
            Err(parse_err) => {
                self.report_parse_failure(conn_id, raw, &parse_err);
                return;
            }
        };

        let result = match event {
            InboundEvent::Join { room } => self.join(conn_id, &room),
            InboundEvent::Chat { content } => self.publish(conn_id, &content).map(|_| ()),
            InboundEvent::Typing { is_typing } => self.typing(conn_id, is_typing),
            InboundEvent::Leave { .. } => self.leave(conn_id),
            InboundEvent::Pong {} => {
                if let Ok(handle) = self.get(conn_id) {
                    handle.mark_alive();
                }
                Ok(())
            }
        };

        if let Err(err) = result {
            self.report_error(conn_id, &err);
        }
    }

    /// Distinguishes an unknown `type` discriminator from malformed JSON.
    fn report_parse_failure(&self, conn_id: ConnectionId, raw: &str, parse_err: &serde_json::Error) {
        let err = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) if value.get("type").is_some_and(|t| t.is_string()) => {
                AppError::unknown_event_type("Unknown message type")
            }
            _ => AppError::validation(format!("Invalid message format: {parse_err}")),
        };
        self.report_error(conn_id, &err);
    }

    fn report_error(&self, conn_id: ConnectionId, err: &AppError) {
        warn!(conn_id = %conn_id, kind = %err.kind, error = %err.message, "Inbound event rejected");
        if let Ok(handle) = self.get(conn_id) {
            handle.send(OutboundEvent::error(
                err.message.clone(),
                Some(err.kind.to_string()),
            ));
        }
    }

    /// Looks up a handle, failing for an unknown (already removed) id.
    pub fn get(&self, conn_id: ConnectionId) -> AppResult<Arc<ConnectionHandle>> {
        self.connections
            .get(&conn_id)
            .map(|e| Arc::clone(e.value()))
            .ok_or_else(|| AppError::new(ErrorKind::NotFound, "Unknown connection"))
    }

    /// Returns the room a connection is currently in.
    pub fn room_of(&self, conn_id: ConnectionId) -> Option<String> {
        self.rooms.room_of(conn_id)
    }

    /// Returns the member ids of a room.
    pub fn room_members(&self, room: &str) -> Vec<ConnectionId> {
        self.rooms.members_of(room)
    }

    /// Returns the total live connection count.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Returns the heartbeat interval from configuration.
    pub fn ping_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.config.ping_interval_seconds)
    }

    /// Removes every connection. Used during shutdown.
    pub fn close_all(&self) {
        let ids: Vec<ConnectionId> = self.connections.iter().map(|e| *e.key()).collect();
        let count = ids.len();
        for id in ids {
            self.remove(id);
        }
        if count > 0 {
            info!(count, "All connections closed");
        }
    }
}
