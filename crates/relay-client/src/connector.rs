//! Transport abstraction and the production WebSocket connector.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use relay_core::error::AppError;
use relay_core::result::AppResult;
use relay_realtime::event::types::{InboundEvent, OutboundEvent};

/// An established transport, driven until it closes.
#[async_trait]
pub trait Transport: Send {
    /// Runs the transport to completion. Returning means the connection
    /// is gone, cleanly or otherwise.
    async fn drive(self: Box<Self>);
}

/// Establishes transports. Behind a trait so the retry loop can be
/// exercised without a network.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Attempts one connection.
    async fn connect(&self) -> AppResult<Box<dyn Transport>>;
}

/// Production connector: WebSocket handshake with the token in the
/// query string, server events forwarded to a channel.
pub struct WsConnector {
    url: String,
    token: String,
    events: mpsc::Sender<OutboundEvent>,
}

impl WsConnector {
    /// Creates a connector for `url` (e.g. `ws://host:port/ws`).
    pub fn new(url: impl Into<String>, token: impl Into<String>, events: mpsc::Sender<OutboundEvent>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
            events,
        }
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> AppResult<Box<dyn Transport>> {
        let url = format!("{}?token={}", self.url, self.token);
        let (stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| AppError::service_unavailable(format!("WebSocket connect failed: {e}")))?;

        Ok(Box::new(WsTransport {
            stream,
            events: self.events.clone(),
        }))
    }
}

struct WsTransport {
    stream: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    events: mpsc::Sender<OutboundEvent>,
}

#[async_trait]
impl Transport for WsTransport {
    async fn drive(self: Box<Self>) {
        let (mut sink, mut source) = self.stream.split();

        while let Some(frame) = source.next().await {
            let message = match frame {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "WebSocket read error");
                    break;
                }
            };

            match message {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<OutboundEvent>(text.as_str()) {
                        Ok(event) => event,
                        Err(e) => {
                            warn!(error = %e, "Unparseable server event");
                            continue;
                        }
                    };

                    // Heartbeats are answered here; everything else goes
                    // to the consumer.
                    if let OutboundEvent::Ping { .. } = event {
                        let pong = serde_json::to_string(&InboundEvent::Pong {})
                            .unwrap_or_else(|_| r#"{"type":"pong"}"#.to_string());
                        if sink.send(Message::Text(pong.into())).await.is_err() {
                            break;
                        }
                        continue;
                    }

                    if self.events.send(event).await.is_err() {
                        debug!("Event consumer dropped, closing transport");
                        break;
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    }
}
