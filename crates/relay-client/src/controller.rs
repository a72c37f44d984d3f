//! Reconnection controller.
//!
//! Owns the connect/drive/retry loop. The loop is strictly sequential,
//! so at most one retry timer is ever pending and attempts can never
//! overlap.

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{info, warn};

use relay_core::config::reconnect::ReconnectConfig;

use crate::backoff::BackoffPolicy;
use crate::connector::{Connector, Transport};
use crate::state::ClientState;

/// Drives a [`Connector`] until the transport stays up or the retry
/// budget is exhausted.
pub struct ReconnectController<C: Connector> {
    connector: C,
    policy: BackoffPolicy,
    max_attempts: u32,
    state_tx: watch::Sender<ClientState>,
}

impl<C: Connector> ReconnectController<C> {
    /// Creates a controller. State starts as `Disconnected`.
    pub fn new(connector: C, config: &ReconnectConfig) -> Self {
        let (state_tx, _) = watch::channel(ClientState::Disconnected);
        Self {
            connector,
            policy: BackoffPolicy::new(config),
            max_attempts: config.max_attempts,
            state_tx,
        }
    }

    /// Returns a receiver observing state transitions.
    pub fn state(&self) -> watch::Receiver<ClientState> {
        self.state_tx.subscribe()
    }

    /// Runs until the controller gives up. Each transport loss consumes
    /// one retry from the budget; a successful connect refills it.
    pub async fn run(self) {
        let mut attempt: u32 = 0;

        loop {
            self.state_tx.send_replace(ClientState::Connecting);

            match self.connector.connect().await {
                Ok(transport) => {
                    attempt = 0;
                    self.state_tx.send_replace(ClientState::Connected);
                    info!("Connected");
                    transport.drive().await;
                    warn!("Transport lost");
                }
                Err(err) => {
                    warn!(error = %err, "Connection attempt failed");
                }
            }

            self.state_tx.send_replace(ClientState::Disconnected);

            if attempt >= self.max_attempts {
                let message = format!(
                    "Unable to reach the server after {} attempts, giving up",
                    self.max_attempts
                );
                warn!("{message}");
                self.state_tx.send_replace(ClientState::GaveUp { message });
                return;
            }

            let delay = self.policy.delay(attempt);
            attempt += 1;
            info!(attempt, delay_ms = delay.as_millis() as u64, "Retrying after backoff");
            sleep(delay).await;
        }
    }
}
