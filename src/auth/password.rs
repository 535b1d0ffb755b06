//! Argon2id credential hashing.
//!
//! Hashing is deliberately slow, so both public entry points hop onto the
//! blocking pool and the request task only awaits the result.

use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Salted digest of `plain`; a fresh salt per call.
pub async fn hash(plain: String) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || digest(&plain))
        .await
        .context("hash task panicked")?
}

/// `Ok(false)` on any mismatch. `Err` only for an unreadable stored digest.
pub async fn verify(stored: String, plain: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || matches(&stored, &plain))
        .await
        .context("verify task panicked")?
}

fn digest(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hash failed");
            anyhow::anyhow!("argon2 hash: {e}")
        })
}

fn matches(stored: &str, plain: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| {
        error!(error = %e, "stored password hash is unreadable");
        anyhow::anyhow!("argon2 parse: {e}")
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}
