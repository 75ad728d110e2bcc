use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::session::errors::SessionError;
use crate::utils::random_bytes;

/// Verify a submitted password against a stored Argon2 PHC hash string.
///
/// An unparseable hash verifies to false.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash.trim()) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!("Admin password hash is not a valid PHC string: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// Hash a password into a PHC string suitable for `ADMIN_PASSWORD_HASH`.
pub fn hash_password(plain: &str) -> Result<String, SessionError> {
    let salt = SaltString::encode_b64(&random_bytes(16)?)
        .map_err(|e| SessionError::PasswordHash(e.to_string()))?;

    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| SessionError::PasswordHash(e.to_string()))
}
