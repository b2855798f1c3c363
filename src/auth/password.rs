use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt work factor for stored passwords.
pub const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, HASH_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks a plaintext password against a stored bcrypt hash.
///
/// The HTTP surface never compares passwords; this is the counterpart to
/// [`hash_password`] for callers holding a stored record.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
