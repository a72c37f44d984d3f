//! Per-connection heartbeat loop.
//!
//! Each tick checks the liveness flag the pong handler sets and, when
//! the connection is still live, queues a `ping`. A connection that
//! produced no pong across an entire tick-to-tick span is evicted
//! through the regular removal path, so its room still gets the
//! `user_left` announcement.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use crate::connection::registry::ConnectionRegistry;

use super::handle::ConnectionHandle;

/// Drives the heartbeat for one connection until it closes or is
/// evicted. Spawned per connection alongside the transport tasks.
pub async fn run_heartbeat(
    registry: Arc<ConnectionRegistry>,
    handle: Arc<ConnectionHandle>,
    interval: Duration,
) {
    // First tick lands one full interval after admission, so a freshly
    // admitted connection always has a whole interval to respond to the
    // first ping before the flag is inspected again.
    let mut ticker = interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = handle.wait_closed() => {
                debug!(conn_id = %handle.id, "Heartbeat stopped, connection closed");
                return;
            }
        }

        if !handle.is_open() {
            return;
        }

        if !handle.take_alive() {
            info!(
                conn_id = %handle.id,
                user = %handle.identity.username,
                "No pong received, evicting connection"
            );
            registry.remove(handle.id);
            return;
        }

        handle.send(crate::event::types::OutboundEvent::ping());
    }
}
