//! Authentication error types.
//!
//! The API boundary deliberately collapses most failures to a small set
//! of user-safe variants: internal causes are logged at the point of
//! failure and never leaked to the client.

use thiserror::Error;

/// Authentication operation errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong username or password, unreachable directory, or any other
    /// failure the caller must not be able to distinguish.
    #[error("Invalid LDAP credentials")]
    InvalidCredentials,

    /// Reconciliation of the directory user failed.
    #[error("User registration failed")]
    RegistrationFailed,

    /// The presented token failed verification.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The presented refresh token failed verification or carried the
    /// wrong `type` claim.
    #[error("Invalid or expired refresh token")]
    InvalidRefreshToken,

    /// The login input was rejected before any directory traffic.
    #[error("Invalid login input")]
    InvalidInput,

    /// Missing or malformed authentication configuration.
    #[error("Authentication configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal authentication error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Checks whether this error maps to an HTTP 401 at the API boundary.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::RegistrationFailed
                | Self::InvalidToken
                | Self::InvalidRefreshToken
        )
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_classification() {
        assert!(AuthError::InvalidCredentials.is_unauthorized());
        assert!(AuthError::InvalidToken.is_unauthorized());
        assert!(!AuthError::config("missing secret").is_unauthorized());
    }
}
