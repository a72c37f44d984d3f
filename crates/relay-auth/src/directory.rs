//! In-memory user directory.
//!
//! Process-local account storage with no durability guarantee, by design.
//! Accounts are either standard (direct signup) or federated (provisioned
//! through an external identity provider).

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::info;

use relay_core::error::AppError;
use relay_core::result::AppResult;
use relay_core::types::UserId;

use crate::password::PasswordHasher;
use crate::token::claims::UserSource;

/// A stored user account.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Stable user id, assigned at registration.
    pub id: UserId,
    /// Unique username.
    pub username: String,
    /// Unique email.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Account origin.
    pub source: UserSource,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last successful login.
    pub last_login_at: DateTime<Utc>,
}

/// Username-keyed in-memory account store.
#[derive(Debug)]
pub struct UserDirectory {
    /// Username → record.
    users: DashMap<String, UserRecord>,
    hasher: PasswordHasher,
}

impl UserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            hasher: PasswordHasher::new(),
        }
    }

    /// Registers a new account. Fails with `Conflict` when the username or
    /// email is already taken.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
        source: UserSource,
    ) -> AppResult<UserRecord> {
        if self.users.contains_key(username) {
            return Err(AppError::conflict("Username already exists"));
        }
        if self.users.iter().any(|u| u.email == email) {
            return Err(AppError::conflict("Email already exists"));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: UserId::new(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: self.hasher.hash_password(password)?,
            source,
            created_at: now,
            last_login_at: now,
        };

        self.users.insert(username.to_string(), record.clone());
        info!(username, %source, "User registered");
        Ok(record)
    }

    /// Verifies credentials and returns the account on success.
    ///
    /// The same error is returned for an unknown username and a wrong
    /// password so the login path does not leak which usernames exist.
    pub fn login(&self, username: &str, password: &str) -> AppResult<UserRecord> {
        let mut entry = self
            .users
            .get_mut(username)
            .ok_or_else(|| AppError::auth_invalid("Invalid username or password"))?;

        if !self.hasher.verify_password(password, &entry.password_hash)? {
            return Err(AppError::auth_invalid("Invalid username or password"));
        }

        entry.last_login_at = Utc::now();
        info!(username, "User logged in");
        Ok(entry.clone())
    }

    /// Looks up an account by username.
    pub fn get(&self, username: &str) -> Option<UserRecord> {
        self.users.get(username).map(|u| u.clone())
    }

    /// Returns the number of registered accounts.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::error::ErrorKind;

    #[test]
    fn register_then_login() {
        let dir = UserDirectory::new();
        let record = dir
            .register("alice", "hunter22", "alice@example.com", UserSource::Standard)
            .unwrap();

        let logged_in = dir.login("alice", "hunter22").unwrap();
        assert_eq!(logged_in.id, record.id);
        assert!(logged_in.last_login_at >= record.last_login_at);
    }

    #[test]
    fn duplicate_username_and_email_rejected() {
        let dir = UserDirectory::new();
        dir.register("alice", "pw-123456", "alice@example.com", UserSource::Standard)
            .unwrap();

        let err = dir
            .register("alice", "pw-123456", "other@example.com", UserSource::Standard)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        let err = dir
            .register("bob", "pw-123456", "alice@example.com", UserSource::Standard)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[test]
    fn wrong_password_and_unknown_user_look_identical() {
        let dir = UserDirectory::new();
        dir.register("alice", "pw-123456", "alice@example.com", UserSource::Standard)
            .unwrap();

        let wrong = dir.login("alice", "nope").unwrap_err();
        let unknown = dir.login("nobody", "nope").unwrap_err();
        assert_eq!(wrong.kind, unknown.kind);
        assert_eq!(wrong.message, unknown.message);
    }
}
