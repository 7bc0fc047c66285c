//! Password hashing and verification with Argon2id
//!
//! Hashes are stored as PHC-format strings (e.g. `$argon2id$v=19$...`) in
//! the user account table. Verification parses the stored string, so
//! parameter changes only affect newly created hashes. Hashing costs real
//! CPU time, so both operations run on the blocking thread pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Errors that can occur during password hashing operations
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Hashing the plaintext failed
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// The stored hash could not be parsed
    #[error("Invalid password hash: {0}")]
    InvalidHash(String),

    /// The blocking hashing task did not complete
    #[error("Password hashing task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

/// Hash a password using Argon2id with a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub async fn hash_password(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password_blocking(&password)).await?
}

/// Verify a password against a PHC-format hash string
///
/// Returns `Ok(false)` on a mismatch; `Err` only when the stored hash
/// itself is malformed.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed
pub async fn verify_password(password: String, hash: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &hash)).await?
}

fn hash_password_blocking(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_password_blocking(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
