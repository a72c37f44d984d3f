//! Integration tests for the WebSocket endpoint.
//!
//! The handshake gate and the first hops of the message flow run against a
//! real listener, since upgrades need an actual connection behind them. The
//! deeper room semantics are covered by the registry tests in relay-realtime.

use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

use crate::helpers::TestApp;

/// Attempt a handshake and return the HTTP status and body of the rejection.
async fn rejected_handshake(addr: std::net::SocketAddr, query: &str) -> (u16, String) {
    let url = format!("ws://{addr}/ws{query}");
    match connect_async(url.as_str()).await {
        Ok(_) => panic!("Handshake unexpectedly succeeded"),
        Err(WsError::Http(response)) => {
            let status = response.status().as_u16();
            let body = response
                .body()
                .as_deref()
                .map(|b| String::from_utf8_lossy(b).to_string())
                .unwrap_or_default();
            (status, body)
        }
        Err(other) => panic!("Unexpected handshake error: {other}"),
    }
}

async fn next_event(
    stream: &mut (impl StreamExt<Item = Result<Message, WsError>> + Unpin),
) -> Value {
    loop {
        let msg = stream
            .next()
            .await
            .expect("Stream ended unexpectedly")
            .expect("WebSocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("Invalid JSON frame");
        }
    }
}

#[tokio::test]
async fn ws_without_token_is_rejected() {
    let app = TestApp::new();
    let addr = app.serve().await;

    let (status, body) = rejected_handshake(addr, "").await;
    assert_eq!(status, 401);
    assert_eq!(body, "Authentication token required");
    assert_eq!(app.state.engine.registry.connection_count(), 0);
}

#[tokio::test]
async fn ws_with_garbage_token_is_rejected() {
    let app = TestApp::new();
    let addr = app.serve().await;

    let (status, body) = rejected_handshake(addr, "?token=garbage").await;
    assert_eq!(status, 401);
    assert_eq!(body, "Invalid or expired token");
    assert_eq!(app.state.engine.registry.connection_count(), 0);
}

#[tokio::test]
async fn ws_with_revoked_token_names_the_reason() {
    let app = TestApp::new();
    let token = app.register("ivan", "password123").await;
    app.request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    let addr = app.serve().await;

    let (status, body) = rejected_handshake(addr, &format!("?token={token}")).await;
    assert_eq!(status, 401);
    assert_eq!(body, "Token revoked");
    assert_eq!(app.state.engine.registry.connection_count(), 0);
}

#[tokio::test]
async fn evicted_silent_client_gets_its_socket_closed() {
    let mut config = relay_core::config::AppConfig::default();
    config.realtime.ping_interval_seconds = 1;
    let app = TestApp::with_config(config);
    let token = app.register("mallory", "password123").await;
    let addr = app.serve().await;

    let url = format!("ws://{addr}/ws?token={token}");
    let (mut stream, _response) = connect_async(url.as_str())
        .await
        .expect("Handshake should succeed");

    let welcome = next_event(&mut stream).await;
    assert_eq!(welcome["type"], "connection");

    // Never answer the server's pings. Eviction must not leave the
    // socket half-open: the stream has to end shortly after.
    let closed = tokio::time::timeout(std::time::Duration::from_secs(10), async {
        loop {
            match stream.next().await {
                None | Some(Ok(Message::Close(_))) | Some(Err(_)) => break,
                Some(Ok(_)) => {}
            }
        }
    })
    .await;

    assert!(closed.is_ok(), "Socket stayed open after eviction");
    assert_eq!(app.state.engine.registry.connection_count(), 0);
}

#[tokio::test]
async fn ws_connects_joins_and_echoes_chat() {
    let app = TestApp::new();
    let token = app.register("judy", "password123").await;
    let addr = app.serve().await;

    let url = format!("ws://{addr}/ws?token={token}");
    let (mut stream, _response) = connect_async(url.as_str())
        .await
        .expect("Handshake should succeed");

    let welcome = next_event(&mut stream).await;
    assert_eq!(welcome["type"], "connection");
    assert_eq!(app.state.engine.registry.connection_count(), 1);

    stream
        .send(Message::Text(
            serde_json::json!({"type": "join", "room": "lobby"})
                .to_string()
                .into(),
        ))
        .await
        .expect("Failed to send join");

    let joined = next_event(&mut stream).await;
    assert_eq!(joined["type"], "room_joined");
    assert_eq!(joined["room"], "lobby");

    stream
        .send(Message::Text(
            serde_json::json!({"type": "chat", "content": "hello"})
                .to_string()
                .into(),
        ))
        .await
        .expect("Failed to send chat");

    let chat = next_event(&mut stream).await;
    assert_eq!(chat["type"], "chat");
    assert_eq!(chat["content"], "hello");
    assert_eq!(chat["room"], "lobby");
    assert_eq!(chat["sender"], "judy");
    assert!(chat["messageId"].as_str().is_some());
}
