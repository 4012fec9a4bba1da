use crate::error::{AppError, Result};

/// Hashes a password with bcrypt at the given cost. The salt is generated
/// per call and embedded in the returned string.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {}", e)))
}

/// Checks a password against a stored bcrypt hash. Malformed stored values
/// never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}
