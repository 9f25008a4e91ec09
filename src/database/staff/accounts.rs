//! Credential service for operator accounts
//!
//! This is the only code that touches the `accounts` table. Passwords are
//! stored as unsalted SHA-256 hex digests.

use crate::errors::{is_unique_violation, AuthError};
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_LEN: usize = 4;

/// Account role
///
/// Registration always assigns [`Role::Employee`]; nothing in this program
/// grants [`Role::Admin`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role '{}'", s)),
        }
    }
}

/// An authenticated operator
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub logged_in_at: DateTime<Local>,
}

/// Hash a password into a 64-character lowercase hex digest
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Registration and login against the `accounts` table
pub struct CredentialService<'a> {
    conn: &'a Connection,
}

impl<'a> CredentialService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Register a new account with the default role
    pub fn register(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::EmptyUsername);
        }

        if self.exists(username)? {
            return Err(AuthError::DuplicateUsername);
        }

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min_len: MIN_PASSWORD_LEN,
            });
        }

        self.conn
            .execute(
                "INSERT INTO accounts (username, password_hash, role) VALUES (?1, ?2, ?3)",
                (username, hash_password(password), Role::default().as_str()),
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AuthError::DuplicateUsername
                } else {
                    AuthError::from(e)
                }
            })?;

        info!("registered account '{}'", username);
        Ok(())
    }

    /// Check a username/password pair and open a session
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let username = username.trim();

        let role: Option<String> = self
            .conn
            .query_row(
                "SELECT role FROM accounts WHERE username = ?1 AND password_hash = ?2",
                (username, hash_password(password)),
                |row| row.get(0),
            )
            .optional()?;

        let Some(role) = role else {
            warn!("rejected login for '{}'", username);
            return Err(AuthError::InvalidCredentials);
        };

        // Unknown role strings fall back to the least privileged role
        let role = role.parse::<Role>().unwrap_or_default();

        info!("operator '{}' logged in", username);
        Ok(Session {
            username: username.to_string(),
            role,
            logged_in_at: Local::now(),
        })
    }

    /// Whether an account with this (trimmed) username exists
    pub fn exists(&self, username: &str) -> Result<bool, AuthError> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT username FROM accounts WHERE username = ?1",
                [username.trim()],
                |row| row.get(0),
            )
            .optional()?;
        debug!("account lookup '{}': {}", username, found.is_some());
        Ok(found.is_some())
    }

    /// Number of registered accounts
    pub fn count(&self) -> Result<u64, AuthError> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::{DatabaseConn, SchemaManager};

    fn setup_test_db() -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        SchemaManager::new(&db.conn).bootstrap().unwrap();
        db
    }

    #[test]
    fn test_hash_password() {
        let hash = hash_password("secret1");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_password("secret1"));
        assert_ne!(hash, hash_password("secret2"));
        // sha256("abc")
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_register_and_login() {
        let db = setup_test_db();
        let auth = CredentialService::new(&db.conn);

        auth.register("alice", "secret1").unwrap();

        let session = auth.login("alice", "secret1").unwrap();
        assert_eq!(session.username, "alice");
        assert_eq!(session.role, Role::Employee);

        assert!(matches!(
            auth.login("alice", "secret2"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("bob", "secret1"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_duplicate_username() {
        let db = setup_test_db();
        let auth = CredentialService::new(&db.conn);

        auth.register("alice", "secret1").unwrap();
        assert!(matches!(
            auth.register("alice", "other-password"),
            Err(AuthError::DuplicateUsername)
        ));
        // surrounding whitespace does not create a distinct account
        assert!(matches!(
            auth.register("  alice ", "secret1"),
            Err(AuthError::DuplicateUsername)
        ));
        assert_eq!(auth.count().unwrap(), 1);
    }

    #[test]
    fn test_empty_username() {
        let db = setup_test_db();
        let auth = CredentialService::new(&db.conn);

        assert!(matches!(
            auth.register("", "secret1"),
            Err(AuthError::EmptyUsername)
        ));
        assert!(matches!(
            auth.register("   ", "secret1"),
            Err(AuthError::EmptyUsername)
        ));
    }

    #[test]
    fn test_weak_password() {
        let db = setup_test_db();
        let auth = CredentialService::new(&db.conn);

        assert!(matches!(
            auth.register("alice", "abc"),
            Err(AuthError::WeakPassword { min_len: 4 })
        ));
        auth.register("alice", "abcd").unwrap();
    }

    #[test]
    fn test_stored_hash_not_plaintext() {
        let db = setup_test_db();
        let auth = CredentialService::new(&db.conn);
        auth.register("alice", "secret1").unwrap();

        let (stored, role): (String, String) = db
            .conn
            .query_row(
                "SELECT password_hash, role FROM accounts WHERE username = 'alice'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(stored, hash_password("secret1"));
        assert_eq!(role, "employee");
    }

    #[test]
    fn test_login_trims_username() {
        let db = setup_test_db();
        let auth = CredentialService::new(&db.conn);
        auth.register(" alice ", "secret1").unwrap();

        assert!(auth.exists("alice").unwrap());
        assert!(auth.login("alice ", "secret1").is_ok());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
    }
}
