//! `coffer login`, `coffer hash-password` and the optional login gate in
//! front of vault commands.

use anyhow::{Context, Result, bail};
use coffer_auth::{Account, Authenticator, Credentials, Session, SessionManager, hash_password};

use crate::config::AuthConfig;

/// Environment variables read by the login gate.
pub const USERNAME_ENV: &str = "COFFER_USERNAME";
pub const PASSWORD_ENV: &str = "COFFER_PASSWORD";

fn session_manager(config: &AuthConfig) -> SessionManager {
    let account = Account::admin(config.username.clone(), config.password_hash.clone());
    SessionManager::new(Authenticator::new(account))
}

pub fn cmd_login(config: &AuthConfig, username: String, password: String) -> Result<()> {
    let mut sessions = session_manager(config);
    let session = sessions.login(&Credentials::new(username, password))?;

    println!("Logged in as {} ({})", session.username, session.user_id);
    if let Some(email) = &session.email {
        println!("Email:   {email}");
    }
    println!("Session: {}", session.id);
    println!("Started: {}", session.started_at.format("%Y-%m-%d %H:%M:%S UTC"));

    sessions.logout();
    Ok(())
}

pub fn cmd_hash_password(password: &str) -> Result<()> {
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }
    let hash = hash_password(password).context("failed to hash password")?;
    println!("{hash}");
    Ok(())
}

/// Open a session from the environment when `[auth] require_login` is set.
///
/// Returns `None` when the gate is disabled.
pub fn authorize(config: &AuthConfig) -> Result<Option<Session>> {
    if !config.require_login {
        return Ok(None);
    }

    let username = std::env::var(USERNAME_ENV).unwrap_or_default();
    let password = std::env::var(PASSWORD_ENV).unwrap_or_default();
    authorize_with(config, Credentials::new(username, password)).map(Some)
}

fn authorize_with(config: &AuthConfig, credentials: Credentials) -> Result<Session> {
    let mut sessions = session_manager(config);
    let session = sessions
        .login(&credentials)
        .with_context(|| format!("login required: set {USERNAME_ENV} and {PASSWORD_ENV}"))?
        .clone();
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_auth::hash_password_with_iterations;

    fn gated() -> AuthConfig {
        AuthConfig {
            username: "admin".into(),
            password_hash: Some(hash_password_with_iterations("admin123", 1_000).unwrap()),
            require_login: true,
        }
    }

    #[test]
    fn gate_disabled_by_default() {
        assert!(authorize(&AuthConfig::default()).unwrap().is_none());
    }

    #[test]
    fn gate_accepts_matching_credentials() {
        let session = authorize_with(&gated(), Credentials::new("admin", "admin123")).unwrap();
        assert_eq!(session.username, "admin");
    }

    #[test]
    fn gate_rejects_bad_credentials() {
        let err = authorize_with(&gated(), Credentials::new("admin", "guess")).unwrap_err();
        assert!(err.to_string().contains("login required"));
    }

    #[test]
    fn login_without_configured_hash_fails() {
        assert!(cmd_login(&AuthConfig::default(), "admin".into(), "admin123".into()).is_err());
    }

    #[test]
    fn blank_password_is_not_hashed() {
        assert!(cmd_hash_password("  ").is_err());
    }
}
