//! Password verification using bcrypt.

use crate::error::AuthError;

/// Verify a plaintext password against a bcrypt hash.
///
/// Returns `Ok(true)` on match, `Ok(false)` on mismatch, or
/// `Err(AuthError::Crypto)` if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Crypto(format!("verify error: {e}")))
}
