//! Unified application error types for Orbit Relay.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The presented token is malformed or its signature does not verify.
    AuthInvalid,
    /// The presented token is past its expiry.
    AuthExpired,
    /// The presented token has been explicitly revoked.
    AuthRevoked,
    /// A room name failed validation (empty or too long).
    InvalidRoom,
    /// The connection attempted a room-scoped operation without a room.
    NotInRoom,
    /// Message content failed validation (empty or oversized).
    ContentInvalid,
    /// An inbound event carried an unrecognized type discriminator.
    UnknownEventType,
    /// A rate limit was exceeded.
    RateLimited,
    /// Input validation failed.
    Validation,
    /// A conflict occurred (duplicate entry, concurrent modification, etc.).
    Conflict,
    /// The requested resource was not found.
    NotFound,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
    /// The service is temporarily unavailable.
    ServiceUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthInvalid => write!(f, "AUTH_INVALID"),
            Self::AuthExpired => write!(f, "AUTH_EXPIRED"),
            Self::AuthRevoked => write!(f, "AUTH_REVOKED"),
            Self::InvalidRoom => write!(f, "INVALID_ROOM"),
            Self::NotInRoom => write!(f, "NOT_IN_ROOM"),
            Self::ContentInvalid => write!(f, "CONTENT_INVALID"),
            Self::UnknownEventType => write!(f, "UNKNOWN_EVENT_TYPE"),
            Self::RateLimited => write!(f, "RATE_LIMITED"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::ServiceUnavailable => write!(f, "SERVICE_UNAVAILABLE"),
        }
    }
}

/// The unified application error used throughout Orbit Relay.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-token error.
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthInvalid, message)
    }

    /// Create an expired-token error.
    pub fn auth_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthExpired, message)
    }

    /// Create a revoked-token error.
    pub fn auth_revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthRevoked, message)
    }

    /// Create an invalid-room error.
    pub fn invalid_room(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRoom, message)
    }

    /// Create a not-in-room error.
    pub fn not_in_room(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotInRoom, message)
    }

    /// Create a content-invalid error.
    pub fn content_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContentInvalid, message)
    }

    /// Create an unknown-event-type error.
    pub fn unknown_event_type(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownEventType, message)
    }

    /// Create a rate-limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RateLimited, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Returns true for any of the three authentication failure kinds.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::AuthInvalid | ErrorKind::AuthExpired | ErrorKind::AuthRevoked
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_codes_are_stable() {
        assert_eq!(ErrorKind::AuthRevoked.to_string(), "AUTH_REVOKED");
        assert_eq!(ErrorKind::NotInRoom.to_string(), "NOT_IN_ROOM");
        assert_eq!(ErrorKind::RateLimited.to_string(), "RATE_LIMITED");
    }

    #[test]
    fn auth_failure_predicate() {
        assert!(AppError::auth_expired("token expired").is_auth_failure());
        assert!(AppError::auth_revoked("revoked").is_auth_failure());
        assert!(!AppError::invalid_room("bad room").is_auth_failure());
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = AppError::content_invalid("message too long");
        assert_eq!(err.to_string(), "CONTENT_INVALID: message too long");
    }
}
