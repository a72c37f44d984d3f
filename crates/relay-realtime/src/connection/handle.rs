//! Individual connection handle.

use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, mpsc};
use uuid::Uuid;

use relay_auth::token::claims::Identity;

use crate::event::types::OutboundEvent;

/// Unique connection identifier, stable for the process lifetime.
pub type ConnectionId = Uuid;

/// A handle to a single live connection.
///
/// Holds the sender half of the outbound queue plus the immutable
/// identity the token authority bound to this transport. The current
/// room lives in the room index, not here, so membership has a single
/// authoritative home.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// Authenticated identity owning this connection.
    pub identity: Identity,
    /// When the connection was admitted.
    pub connected_at: DateTime<Utc>,
    /// Sender for outbound events.
    sender: mpsc::Sender<OutboundEvent>,
    /// Heartbeat flag: set on pong, cleared and checked at each tick.
    alive: AtomicBool,
    /// Whether the transport is still open.
    open: AtomicBool,
    /// Fired once when the handle is closed.
    closed: Notify,
}

impl ConnectionHandle {
    /// Creates a handle for a freshly admitted transport.
    pub fn new(identity: Identity, sender: mpsc::Sender<OutboundEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            connected_at: Utc::now(),
            sender,
            alive: AtomicBool::new(true),
            open: AtomicBool::new(true),
            closed: Notify::new(),
        }
    }

    /// Queues an outbound event without blocking.
    ///
    /// Returns false when the transport is closed or its buffer is full;
    /// the event is dropped and logged, never retried. A slow or dead
    /// peer must not stall delivery to anyone else.
    pub fn send(&self, event: OutboundEvent) -> bool {
        if !self.is_open() {
            return false;
        }
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Outbound buffer full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Whether the transport is still open.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Marks the transport closed and wakes anything waiting on it.
    pub fn mark_closed(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.closed.notify_waiters();
    }

    /// Records a heartbeat pong.
    pub fn mark_alive(&self) {
        self.alive.store(true, Ordering::SeqCst);
    }

    /// Atomically reads and clears the heartbeat flag.
    ///
    /// Returns whether a pong arrived since the previous tick.
    pub fn take_alive(&self) -> bool {
        self.alive.swap(false, Ordering::SeqCst)
    }

    /// Resolves once the handle has been closed.
    pub async fn wait_closed(&self) {
        let mut notified = pin!(self.closed.notified());
        notified.as_mut().enable();
        if !self.is_open() {
            return;
        }
        notified.await;
    }
}
