//! Top-level real-time engine that ties together the relay subsystems.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use relay_core::config::realtime::RealtimeConfig;
use relay_core::result::AppResult;

use crate::connection::registry::ConnectionRegistry;

/// Central engine coordinating the connection registry and the
/// per-connection background tasks.
#[derive(Clone)]
pub struct RelayEngine {
    /// Connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RelayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayEngine").finish()
    }
}

impl RelayEngine {
    /// Creates a new engine.
    pub fn new(config: RealtimeConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let registry = Arc::new(ConnectionRegistry::new(config));

        info!("Relay engine initialized");

        Self {
            registry,
            shutdown_tx,
        }
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown: signals background tasks and
    /// removes every live connection.
    pub async fn shutdown(&self) -> AppResult<()> {
        info!("Shutting down relay engine");

        let _ = self.shutdown_tx.send(());
        self.registry.close_all();

        info!("Relay engine shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use relay_auth::token::claims::{Identity, UserSource};
    use relay_core::types::UserId;

    fn identity(name: &str) -> Identity {
        Identity {
            user_id: UserId::new(),
            username: name.to_string(),
            source: UserSource::Standard,
            issued_at: Utc::now(),
            expires_at: Utc::now() + chrono::Duration::hours(24),
        }
    }

    #[tokio::test]
    async fn shutdown_closes_every_connection() {
        let engine = RelayEngine::new(RealtimeConfig::default());
        let (_a, _rx_a) = engine.registry.admit(identity("alice"));
        let (_b, _rx_b) = engine.registry.admit(identity("bob"));
        assert_eq!(engine.registry.connection_count(), 2);

        let mut shutdown_rx = engine.shutdown_receiver();
        engine.shutdown().await.unwrap();

        assert_eq!(engine.registry.connection_count(), 0);
        assert!(shutdown_rx.try_recv().is_ok());
    }
}
