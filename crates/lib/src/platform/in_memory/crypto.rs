//! Password hashing for the in-memory account store.
//!
//! Passwords are stored as Argon2id hashes in PHC string format.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

use crate::platform::PlatformError;
use crate::platform::errors::codes;

/// Hash a password using Argon2id with a random salt.
pub fn hash_password(password: impl AsRef<str>) -> Result<String, PlatformError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            PlatformError::new(
                codes::PASSWORD_HASH_FAILED,
                format!("Password hashing failed: {e}"),
            )
        })
}

/// Check a password against a stored PHC hash.
///
/// Malformed hashes never verify.
pub fn verify_password(password: impl AsRef<str>, password_hash: impl AsRef<str>) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash.as_ref()) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed)
        .is_ok()
}
