//! Error types for the coffer-auth crate.

/// Errors raised while hashing passwords or opening a session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // -- Login --------------------------------------------------------------
    /// Username or password was blank.
    #[error("username and password are required")]
    MissingCredentials,

    /// The username is unknown or the password does not match.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// No password hash is configured for the account.
    #[error("account {username} has no password hash configured")]
    NoPasswordHash { username: String },

    // -- Hashing ------------------------------------------------------------
    /// A stored hash string could not be decoded.
    #[error("malformed password hash: {reason}")]
    MalformedHash { reason: String },

    /// Producing a new hash failed.
    #[error("password hashing failed: {reason}")]
    HashFailed { reason: String },
}

/// Convenience alias used throughout the auth crate.
pub type Result<T> = std::result::Result<T, AuthError>;
