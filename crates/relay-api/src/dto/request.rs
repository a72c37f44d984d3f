//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Account registration request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired username.
    pub username: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
    /// Contact email, unique per account.
    pub email: String,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}
