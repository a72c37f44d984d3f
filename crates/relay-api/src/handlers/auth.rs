//! Auth handlers — register, login, logout, refresh.

use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use chrono::{Duration, Utc};
use tracing::warn;

use relay_auth::token::claims::UserSource;
use relay_core::error::AppError;

use crate::dto::request::{LoginRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, MessageResponse, TokenResponse, UserSummary};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let username = req.username.trim();
    if username.is_empty() {
        return Err(AppError::validation("Username is required").into());
    }
    if req.password.len() < state.config.auth.password_min_length {
        return Err(AppError::validation(format!(
            "Password must be at least {} characters",
            state.config.auth.password_min_length
        ))
        .into());
    }

    let record = state
        .directory
        .register(username, &req.password, req.email.trim(), UserSource::Standard)?;
    let token = state.issuer.issue(record.id, &record.username, record.source)?;

    Ok(Json(ApiResponse::ok(TokenResponse {
        token,
        expires_at: Utc::now() + Duration::hours(state.config.auth.token_ttl_hours as i64),
        user: UserSummary::from(&record),
    })))
}

/// POST /api/auth/login
///
/// Rate-limited per origin ip; the limit applies to the attempt itself,
/// so a rejected attempt consumes no budget.
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let origin = addr.ip().to_string();
    if !state.rate_limiter.check(&origin, "login") {
        warn!(origin, "Login rate limit exceeded");
        return Err(AppError::rate_limited("Too many login attempts, try again later").into());
    }

    let record = state.directory.login(&req.username, &req.password)?;
    let token = state.issuer.issue(record.id, &record.username, record.source)?;

    Ok(Json(ApiResponse::ok(TokenResponse {
        token,
        expires_at: Utc::now() + Duration::hours(state.config.auth.token_ttl_hours as i64),
        user: UserSummary::from(&record),
    })))
}

/// POST /api/auth/logout
///
/// Revokes the presented bearer token; it stays rejected until its
/// natural expiry even though the signature remains valid.
pub async fn logout(
    State(state): State<AppState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.revocations.revoke(auth.token())?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Logged out successfully".to_string(),
    })))
}

/// POST /api/auth/refresh
///
/// Verifies the presented token (signature, expiry, revocation) and
/// issues a fresh one with a full TTL.
pub async fn refresh(
    State(state): State<AppState>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let identity = state.verifier.verify(auth.token())?;
    let token = state
        .issuer
        .issue(identity.user_id, &identity.username, identity.source)?;

    Ok(Json(ApiResponse::ok(TokenResponse {
        token,
        expires_at: Utc::now() + Duration::hours(state.config.auth.token_ttl_hours as i64),
        user: UserSummary::from(&identity),
    })))
}
