//! Password hashing with PBKDF2-HMAC-SHA256 (ring).
//!
//! Hashes are stored as `iterations:base64(salt):base64(hash)`. The
//! two-part form `base64(salt):base64(hash)` is also accepted and read
//! with [`DEFAULT_ITERATIONS`].

use std::num::NonZeroU32;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{AuthError, Result};

/// Iteration count for new hashes (OWASP 2023 guidance for SHA-256).
pub const DEFAULT_ITERATIONS: u32 = 600_000;

/// Salt length in bytes.
const SALT_LEN: usize = 32;

/// Derived key length in bytes.
const KEY_LEN: usize = 32;

static PBKDF2_ALG: pbkdf2::Algorithm = pbkdf2::PBKDF2_HMAC_SHA256;

/// Hash `password` with a random salt and [`DEFAULT_ITERATIONS`].
pub fn hash_password(password: &str) -> Result<String> {
    hash_password_with_iterations(password, DEFAULT_ITERATIONS)
}

/// Hash `password` with a random salt and an explicit iteration count.
///
/// # Errors
///
/// Returns [`AuthError::HashFailed`] if `iterations` is zero or the system
/// RNG is unavailable.
pub fn hash_password_with_iterations(password: &str, iterations: u32) -> Result<String> {
    let rounds = non_zero(iterations).ok_or_else(|| AuthError::HashFailed {
        reason: "iteration count must be non-zero".into(),
    })?;

    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| AuthError::HashFailed {
            reason: "failed to generate random salt".into(),
        })?;

    let mut hash = [0u8; KEY_LEN];
    pbkdf2::derive(PBKDF2_ALG, rounds, &salt, password.as_bytes(), &mut hash);

    tracing::debug!(iterations, "hashed password");
    Ok(format!(
        "{iterations}:{}:{}",
        BASE64.encode(salt),
        BASE64.encode(hash)
    ))
}

/// Check `password` against a stored hash string.
///
/// Returns `Ok(false)` on mismatch. Comparison is constant-time.
///
/// # Errors
///
/// Returns [`AuthError::MalformedHash`] if `stored` cannot be decoded.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parts: Vec<&str> = stored.trim().split(':').collect();
    let (iterations, salt, hash) = match parts.as_slice() {
        [iterations, salt, hash] => {
            let iterations = iterations.parse::<u32>().map_err(|e| malformed(format!(
                "invalid iteration count: {e}"
            )))?;
            (iterations, *salt, *hash)
        }
        [salt, hash] => (DEFAULT_ITERATIONS, *salt, *hash),
        _ => return Err(malformed("expected iterations:salt:hash")),
    };

    let rounds = non_zero(iterations).ok_or_else(|| malformed("iteration count is zero"))?;
    let salt = BASE64
        .decode(salt)
        .map_err(|e| malformed(format!("invalid salt encoding: {e}")))?;
    let expected = BASE64
        .decode(hash)
        .map_err(|e| malformed(format!("invalid hash encoding: {e}")))?;

    Ok(pbkdf2::verify(PBKDF2_ALG, rounds, &salt, password.as_bytes(), &expected).is_ok())
}

fn non_zero(iterations: u32) -> Option<NonZeroU32> {
    NonZeroU32::new(iterations)
}

fn malformed(reason: impl Into<String>) -> AuthError {
    AuthError::MalformedHash {
        reason: reason.into(),
    }
}
