//! Room name and chat content validation rules.

use relay_core::config::realtime::RealtimeConfig;
use relay_core::error::AppError;
use relay_core::result::AppResult;

/// Validates a room name: non-empty after trimming, bounded length.
pub fn validate_room_name(name: &str, config: &RealtimeConfig) -> AppResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_room("Room name must not be empty"));
    }
    if trimmed.chars().count() > config.max_room_name_chars {
        return Err(AppError::invalid_room(format!(
            "Room name exceeds {} characters",
            config.max_room_name_chars
        )));
    }
    Ok(())
}

/// Validates chat content and returns the trimmed form that will be
/// broadcast. Oversized or empty content never reaches any room member.
pub fn validate_content(content: &str, config: &RealtimeConfig) -> AppResult<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::content_invalid("Message must not be empty"));
    }
    if trimmed.len() > config.max_content_bytes {
        return Err(AppError::content_invalid(format!(
            "Message exceeds {} bytes",
            config.max_content_bytes
        )));
    }
    Ok(trimmed.to_string())
}
