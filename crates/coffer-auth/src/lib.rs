//! Authentication for Coffer.
//!
//! A single static account protected by a PBKDF2 password hash, and an
//! explicit session object: [`SessionManager::login`] opens a [`Session`],
//! [`SessionManager::logout`] ends it.

pub mod error;
pub mod password;
pub mod session;

pub use error::{AuthError, Result};
pub use password::{DEFAULT_ITERATIONS, hash_password, hash_password_with_iterations, verify_password};
pub use session::{
    ADMIN_EMAIL, ADMIN_ID, ADMIN_USERNAME, Account, Authenticator, Credentials, Session,
    SessionManager,
};
