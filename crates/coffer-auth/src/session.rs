//! Accounts, login and the current session.
//!
//! Coffer has a single static account. [`Authenticator`] checks
//! [`Credentials`] against it and hands out a [`Session`];
//! [`SessionManager`] holds at most one session at a time. The vault core
//! never sees any of this: callers gate access on
//! [`SessionManager::is_authenticated`] before touching the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, Result};
use crate::password::verify_password;

/// Id of the built-in administrator account.
pub const ADMIN_ID: &str = "admin-001";

/// Default administrator username.
pub const ADMIN_USERNAME: &str = "admin";

/// Default administrator email.
pub const ADMIN_EMAIL: &str = "admin@example.com";

// ═══════════════════════════════════════════════════════════════════════
//  Types
// ═══════════════════════════════════════════════════════════════════════

/// Username/password pair supplied at login.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A login-capable account.
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    /// Stored PBKDF2 hash; see [`crate::password`]. `None` disables login.
    pub password_hash: Option<String>,
}

impl Account {
    /// The built-in administrator with the given username and hash.
    pub fn admin(username: impl Into<String>, password_hash: Option<String>) -> Self {
        Self {
            id: ADMIN_ID.to_string(),
            username: username.into(),
            email: Some(ADMIN_EMAIL.to_string()),
            password_hash,
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub user_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub started_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════
//  Authenticator
// ═══════════════════════════════════════════════════════════════════════

/// Checks credentials against a single static account.
#[derive(Debug, Clone)]
pub struct Authenticator {
    account: Account,
}

impl Authenticator {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Verify `credentials` and open a session.
    ///
    /// Surrounding whitespace in the username is ignored; the password is
    /// taken verbatim.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingCredentials`] if either field is blank.
    /// - [`AuthError::NoPasswordHash`] if the account has no hash.
    /// - [`AuthError::InvalidCredentials`] on a wrong username or password.
    /// - [`AuthError::MalformedHash`] if the stored hash is corrupt.
    pub fn login(&self, credentials: &Credentials) -> Result<Session> {
        let username = credentials.username.trim();
        if username.is_empty() || credentials.password.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(stored) = self.account.password_hash.as_deref() else {
            return Err(AuthError::NoPasswordHash {
                username: self.account.username.clone(),
            });
        };

        // Verify even on a username mismatch so timing does not reveal it.
        let password_ok = verify_password(&credentials.password, stored)?;
        if username != self.account.username || !password_ok {
            tracing::warn!(username, "login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session {
            id: Uuid::now_v7(),
            user_id: self.account.id.clone(),
            username: self.account.username.clone(),
            email: self.account.email.clone(),
            started_at: Utc::now(),
        };
        tracing::info!(user_id = %session.user_id, session_id = %session.id, "login succeeded");
        Ok(session)
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  SessionManager
// ═══════════════════════════════════════════════════════════════════════

/// Holds the current session, if any.
#[derive(Debug, Clone)]
pub struct SessionManager {
    authenticator: Authenticator,
    current: Option<Session>,
}

impl SessionManager {
    pub fn new(authenticator: Authenticator) -> Self {
        Self {
            authenticator,
            current: None,
        }
    }

    /// Log in, replacing any existing session on success. A failed attempt
    /// leaves the current session as it was.
    pub fn login(&mut self, credentials: &Credentials) -> Result<&Session> {
        let session = self.authenticator.login(credentials)?;
        Ok(&*self.current.insert(session))
    }

    /// End the current session. Returns it, or `None` if nobody was logged in.
    pub fn logout(&mut self) -> Option<Session> {
        let ended = self.current.take();
        if let Some(session) = &ended {
            tracing::info!(user_id = %session.user_id, session_id = %session.id, "logged out");
        }
        ended
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }
}
