//! Inbound and outbound wire event type definitions.
//!
//! JSON objects with a `type` discriminator. The schema is a single
//! consistent spelling: `chat` and `typing`, not the historical
//! `chat_message`/`typing_start` variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use relay_auth::token::claims::{Identity, UserSource};
use relay_core::types::MessageId;

use crate::connection::handle::ConnectionId;

/// Events sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Join a named room, leaving the current one if any.
    Join {
        /// Target room name.
        room: String,
    },
    /// Publish a chat message to the current room.
    Chat {
        /// Message content.
        content: String,
    },
    /// Typing indicator for the current room.
    Typing {
        /// Whether the user is currently typing.
        #[serde(rename = "isTyping")]
        is_typing: bool,
    },
    /// Leave the current room.
    Leave {
        /// Room name; informational only, the registry's view is
        /// authoritative.
        #[serde(default)]
        room: Option<String>,
    },
    /// Heartbeat response to a server ping.
    Pong {},
}

/// Events sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// Sent once, immediately after admission.
    Connection {
        /// Assigned connection id.
        #[serde(rename = "clientId")]
        client_id: ConnectionId,
        /// Username.
        user: String,
        /// Account origin.
        #[serde(rename = "userType")]
        user_type: UserSource,
        /// Human-readable greeting.
        message: String,
        /// Server timestamp.
        timestamp: DateTime<Utc>,
    },
    /// Direct acknowledgment to a joining connection.
    RoomJoined {
        /// Room that was joined.
        room: String,
        /// Human-readable confirmation.
        message: String,
        /// Server timestamp.
        timestamp: DateTime<Utc>,
    },
    /// Presence: someone joined the room.
    UserJoined {
        /// Username of the joiner.
        user: String,
        /// Account origin of the joiner.
        #[serde(rename = "userType")]
        user_type: UserSource,
        /// Room name.
        room: String,
        /// Human-readable announcement.
        message: String,
        /// Server timestamp.
        timestamp: DateTime<Utc>,
    },
    /// Presence: someone left the room (or was evicted).
    UserLeft {
        /// Username of the leaver.
        user: String,
        /// Account origin of the leaver.
        #[serde(rename = "userType")]
        user_type: UserSource,
        /// Room name.
        room: String,
        /// Human-readable announcement.
        message: String,
        /// Server timestamp.
        timestamp: DateTime<Utc>,
    },
    /// A relayed chat message, echoed to the sender as well.
    Chat {
        /// Unique message id.
        #[serde(rename = "messageId")]
        message_id: MessageId,
        /// Sender username.
        sender: String,
        /// Sender account origin.
        #[serde(rename = "userType")]
        user_type: UserSource,
        /// Message content (trimmed).
        content: String,
        /// Room name.
        room: String,
        /// Server timestamp.
        timestamp: DateTime<Utc>,
    },
    /// Typing indicator relayed to the rest of the room.
    Typing {
        /// Username of the typist.
        user: String,
        /// Account origin of the typist.
        #[serde(rename = "userType")]
        user_type: UserSource,
        /// Whether typing started or stopped.
        #[serde(rename = "isTyping")]
        is_typing: bool,
        /// Room name.
        room: String,
        /// Server timestamp.
        timestamp: DateTime<Utc>,
    },
    /// Server heartbeat ping.
    Ping {
        /// Server timestamp.
        timestamp: DateTime<Utc>,
    },
    /// Error reported on the same connection; never closes the transport.
    Error {
        /// Human-readable description.
        message: String,
        /// Machine-readable code.
        #[serde(skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        /// Server timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl OutboundEvent {
    /// Builds the one-time post-admission welcome event.
    pub fn connection(client_id: ConnectionId, identity: &Identity) -> Self {
        Self::Connection {
            client_id,
            user: identity.username.clone(),
            user_type: identity.source,
            message: "Authenticated and connected to chat server".to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Builds a join acknowledgment.
    pub fn room_joined(room: &str) -> Self {
        Self::RoomJoined {
            room: room.to_string(),
            message: format!("You joined {room}"),
            timestamp: Utc::now(),
        }
    }

    /// Builds a presence join announcement.
    pub fn user_joined(identity: &Identity, room: &str) -> Self {
        Self::UserJoined {
            user: identity.username.clone(),
            user_type: identity.source,
            room: room.to_string(),
            message: format!("{} joined the room", identity.username),
            timestamp: Utc::now(),
        }
    }

    /// Builds a presence leave announcement.
    pub fn user_left(identity: &Identity, room: &str) -> Self {
        Self::UserLeft {
            user: identity.username.clone(),
            user_type: identity.source,
            room: room.to_string(),
            message: format!("{} left the room", identity.username),
            timestamp: Utc::now(),
        }
    }

    /// Builds a heartbeat ping.
    pub fn ping() -> Self {
        Self::Ping {
            timestamp: Utc::now(),
        }
    }

    /// Builds an error event.
    pub fn error(message: impl Into<String>, code: Option<String>) -> Self {
        Self::Error {
            message: message.into(),
            code,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use relay_core::types::UserId;
    use uuid::Uuid;

    fn identity() -> Identity {
        Identity {
            user_id: UserId::new(),
            username: "alice".to_string(),
            source: UserSource::Standard,
            issued_at: Utc::now(),
            expires_at: Utc::now(),
        }
    }

    #[test]
    fn inbound_events_parse_from_wire_json() {
        let join: InboundEvent = serde_json::from_str(r#"{"type":"join","room":"general"}"#).unwrap();
        assert!(matches!(join, InboundEvent::Join { room } if room == "general"));

        let typing: InboundEvent =
            serde_json::from_str(r#"{"type":"typing","isTyping":true}"#).unwrap();
        assert!(matches!(typing, InboundEvent::Typing { is_typing: true }));

        let leave: InboundEvent = serde_json::from_str(r#"{"type":"leave"}"#).unwrap();
        assert!(matches!(leave, InboundEvent::Leave { room: None }));

        let pong: InboundEvent = serde_json::from_str(r#"{"type":"pong"}"#).unwrap();
        assert!(matches!(pong, InboundEvent::Pong {}));
    }

    #[test]
    fn chat_event_serializes_with_camel_case_keys() {
        let event = OutboundEvent::Chat {
            message_id: relay_core::types::MessageId::new(),
            sender: "alice".to_string(),
            user_type: UserSource::Standard,
            content: "hello".to_string(),
            room: "general".to_string(),
            timestamp: Utc::now(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "chat");
        assert_eq!(json["content"], "hello");
        assert_eq!(json["userType"], "standard");
        assert!(json["messageId"].is_string());
    }

    #[test]
    fn presence_events_carry_room_and_announcement() {
        let event = OutboundEvent::user_left(&identity(), "general");
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "user_left");
        assert_eq!(json["room"], "general");
        assert_eq!(json["message"], "alice left the room");
    }

    #[test]
    fn error_event_omits_absent_code() {
        let event = OutboundEvent::error("boom", None);
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "error");
        assert!(json.get("code").is_none());
    }

    #[test]
    fn connection_event_exposes_client_id() {
        let conn_id: ConnectionId = Uuid::new_v4();
        let event = OutboundEvent::connection(conn_id, &identity());
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "connection");
        assert_eq!(json["clientId"], conn_id.to_string());
    }
}
