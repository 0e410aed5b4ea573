//! Password hashing and verification.
//!
//! Uses Argon2id with a per-call random salt embedded in the PHC-format
//! digest, so verification needs nothing beyond the digest itself. Hashing
//! is CPU-bound and runs on the blocking pool so it never stalls the
//! request executor.

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

/// Errors that can occur while hashing a password.
#[derive(Debug)]
pub enum HashError {
    /// The underlying hash computation failed
    Hash(argon2::password_hash::Error),
    /// The blocking worker was cancelled or panicked
    Worker,
}

impl std::fmt::Display for HashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashError::Hash(e) => write!(f, "Failed to hash password: {}", e),
            HashError::Worker => write!(f, "Password hashing worker failed"),
        }
    }
}

impl std::error::Error for HashError {}

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password_sync(password: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(HashError::Hash)?;
    Ok(digest.to_string())
}

/// Verify a password against a stored digest.
///
/// A malformed digest verifies as `false` rather than erroring, so callers
/// cannot distinguish "wrong password" from "corrupt stored digest".
pub fn verify_password_sync(digest: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash a password on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, HashError> {
    tokio::task::spawn_blocking(move || hash_password_sync(&password))
        .await
        .map_err(|_| HashError::Worker)?
}

/// Verify a password on the blocking pool.
pub async fn verify_password(digest: String, password: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password_sync(&digest, &password))
        .await
        .unwrap_or(false)
}
