//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use relay_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Local response wrapper around the domain error.
///
/// Handlers return `Result<_, ApiError>`; `?` on an `AppError` converts
/// through `From`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = match err.kind {
            ErrorKind::AuthInvalid | ErrorKind::AuthExpired | ErrorKind::AuthRevoked => {
                StatusCode::UNAUTHORIZED
            }
            ErrorKind::InvalidRoom
            | ErrorKind::NotInRoom
            | ErrorKind::ContentInvalid
            | ErrorKind::UnknownEventType
            | ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Configuration | ErrorKind::Serialization | ErrorKind::Internal => {
                tracing::error!(error = %err.message, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiErrorResponse {
            error: err.kind.to_string(),
            message: err.message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn kinds_map_to_expected_statuses() {
        assert_eq!(status_of(AppError::auth_invalid("x")), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::auth_expired("x")), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::auth_revoked("x")), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::invalid_room("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::content_invalid("x")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AppError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(status_of(AppError::rate_limited("x")), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status_of(AppError::internal("x")), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
