//! Directory-specific error types.
//!
//! ## Security Note
//!
//! Error messages must not leak sensitive information like
//! passwords, bind credentials, or internal directory structure.

use thiserror::Error;

/// Directory protocol errors.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Invalid or incomplete configuration.
    #[error("Directory configuration error: {0}")]
    Configuration(String),

    /// No usable configuration was found for the request.
    #[error("No directory configuration available: {0}")]
    NoConfiguration(String),

    /// The configuration exists but is disabled.
    #[error("Directory configuration '{0}' is inactive")]
    Inactive(String),

    /// Connection failed.
    #[error("Directory connection failed: {0}")]
    Connection(String),

    /// TLS/certificate error.
    #[error("Directory TLS error: {0}")]
    Tls(String),

    /// Bind (authentication) failed.
    #[error("Directory bind failed: {0}")]
    Bind(String),

    /// Search operation failed.
    #[error("Directory search failed: {0}")]
    Search(String),

    /// User not found in the directory.
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Storage failure while resolving configuration.
    #[error("Storage error: {0}")]
    Storage(#[from] sp_storage::StorageError),

    /// Underlying ldap3 error.
    #[error("Directory protocol error: {0}")]
    Protocol(#[from] ldap3::LdapError),
}

impl DirectoryError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a user not found error.
    #[must_use]
    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound(username.into())
    }

    /// Checks if this is a connection-related error.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Tls(_))
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        assert!(DirectoryError::connection("refused").is_connection_error());
        assert!(DirectoryError::Tls("bad cert".to_string()).is_connection_error());
        assert!(!DirectoryError::config("missing host").is_connection_error());
    }
}
