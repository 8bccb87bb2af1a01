//! Password hashing and the SmartHR password policy.
//!
//! Employee credentials are hashed with Argon2id using a cryptographically
//! random [`OsRng`] salt and stored as PHC strings, so algorithm parameters
//! travel with the hash. The strength policy enforced on every create and
//! change-password path lives here as well, next to the hashing it guards.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Minimum password length accepted for employee accounts.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt,
/// and hash).
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default(); // Argon2id with default params
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Validate a candidate password against the SmartHR policy.
///
/// Requires at least [`MIN_PASSWORD_LENGTH`] characters, at least one
/// letter, and at least one non-letter (digit or symbol). Returns `Ok(())`
/// when the password is acceptable, or `Err` with a human-readable
/// explanation of the first rule violated.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("Password must contain at least one letter".to_string());
    }
    if password.chars().all(|c| c.is_alphabetic()) {
        return Err("Password must contain at least one digit or symbol".to_string());
    }
    Ok(())
}
