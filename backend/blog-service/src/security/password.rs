/// Password hashing and verification using Argon2id
use super::generate_token_key;
use crate::error::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::OnceCell;

/// Hash a password using Argon2id with a random per-password salt.
///
/// Returns a PHC-formatted string safe for database storage.
pub fn hash_password(password: &str) -> Result<String> {
    if password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its PHC hash.
///
/// `Ok(false)` means the password does not match; `Err` means the stored
/// hash is unusable.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash format: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map(|()| true)
        .or_else(|e| match e {
            argon2::password_hash::Error::Password => Ok(false),
            other => Err(AppError::Internal(format!(
                "Password verification failed: {}",
                other
            ))),
        })
}

/// Hash that no login can match, verified in place of a missing user's
/// credential so both paths do one Argon2 verification.
static UNMATCHABLE_HASH: OnceCell<String> = OnceCell::new();

fn unmatchable_hash() -> Result<&'static str> {
    UNMATCHABLE_HASH
        .get_or_try_init(|| hash_password(&generate_token_key()))
        .map(String::as_str)
}

/// Check a login password against the stored hash of the user, if any.
///
/// With no hash (unknown or inactive user) the password is verified against
/// a throwaway hash and the result is always `Ok(false)`.
pub fn check_password(password: &str, stored_hash: Option<&str>) -> Result<bool> {
    match stored_hash {
        Some(hash) => verify_password(password, hash),
        None => {
            verify_password(password, unmatchable_hash()?)?;
            Ok(false)
        }
    }
}
