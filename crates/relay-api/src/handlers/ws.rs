//! WebSocket upgrade handler.
//!
//! Token verification happens before the upgrade, so a failed handshake
//! never creates a connection entry.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use relay_core::error::ErrorKind;
use relay_realtime::connection::heartbeat::run_heartbeat;

use crate::state::AppState;

/// Query parameters for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT bearer token.
    pub token: Option<String>,
}

/// GET /ws?token={jwt} — WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Response {
    let Some(token) = query.token else {
        return (StatusCode::UNAUTHORIZED, "Authentication token required").into_response();
    };

    let identity = match state.verifier.verify(&token) {
        Ok(identity) => identity,
        Err(err) => {
            warn!(kind = %err.kind, "WebSocket authentication failed");
            let reason = if err.kind == ErrorKind::AuthRevoked {
                "Token revoked"
            } else {
                "Invalid or expired token"
            };
            return (StatusCode::UNAUTHORIZED, reason).into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_connection(state, identity, socket))
}

/// Drives one established WebSocket connection to completion.
async fn handle_connection(
    state: AppState,
    identity: relay_auth::token::claims::Identity,
    socket: WebSocket,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let registry = Arc::clone(&state.engine.registry);
    let (handle, mut outbound_rx) = registry.admit(identity);
    let conn_id = handle.id;

    // Outbound forwarder: registry events → wire frames.
    let outbound_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    warn!(conn_id = %conn_id, error = %e, "Failed to serialize outbound event");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Liveness monitor; ends on its own once the entry is removed.
    let heartbeat_task = tokio::spawn(run_heartbeat(
        Arc::clone(&registry),
        Arc::clone(&handle),
        registry.ping_interval(),
    ));

    // Inbound pump. Ends when the peer hangs up or when the entry is
    // removed out from under us (heartbeat eviction, engine shutdown),
    // so a half-open socket never outlives its registry entry.
    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    registry.handle_inbound(conn_id, text.as_str());
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            },
            _ = handle.wait_closed() => break,
        }
    }

    // Teardown: removal announces `user_left` and releases the timers.
    registry.remove(conn_id);
    outbound_task.abort();
    heartbeat_task.abort();

    info!(conn_id = %conn_id, "WebSocket connection closed");
}
