//! Password hashing and verification using Argon2id.
//!
//! Used for the local admin credential only; directory users are
//! validated by binding against the directory server.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{AuthError, AuthResult};

/// Hashes a password into a PHC-formatted Argon2id string.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verifies a password against a PHC-formatted hash.
///
/// Uses constant-time comparison to prevent timing attacks.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if verification fails.
pub fn verify(password: &str, hash: &str) -> AuthResult<()> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| AuthError::Internal(e.to_string()))?;

    // Argon2::default() can verify any Argon2 variant
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hashed = hash("correct horse battery staple").unwrap();
        assert!(verify("correct horse battery staple", &hashed).is_ok());
        assert!(matches!(
            verify("wrong password", &hashed),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn malformed_hash_is_internal_error() {
        assert!(matches!(
            verify("anything", "not-a-phc-string"),
            Err(AuthError::Internal(_))
        ));
    }
}
