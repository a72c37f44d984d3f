//! # relay-api
//!
//! HTTP and WebSocket boundary for Orbit Relay built on Axum.
//!
//! Provides the auth endpoints, the authenticated `/ws` upgrade, DTOs,
//! and the domain-error to HTTP-status mapping.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
