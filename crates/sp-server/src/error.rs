//! API error types.
//!
//! Maps internal errors to HTTP responses. Authentication failures
//! always surface as a 401 with a generic body; the internal cause is
//! logged where it occurs and never reaches the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in the HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Type of entity (e.g., "DirectoryConfig").
        entity_type: &'static str,
        /// Resource identifier.
        id: String,
    },

    /// Duplicate resource (unique constraint violation).
    #[error("{entity_type} already exists: {field} '{value}'")]
    Conflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Field that caused the conflict.
        field: &'static str,
        /// Conflicting value.
        value: String,
    },

    /// Invalid request data.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Authentication failed or token invalid.
    #[error("Authentication failed")]
    Unauthorized,

    /// Authentication layer error.
    #[error("Authentication error")]
    Auth(#[source] sp_auth::AuthError),

    /// Storage layer error.
    #[error("Storage error: {0}")]
    Storage(#[from] sp_storage::StorageError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a not found error for a UUID.
    #[must_use]
    pub fn not_found_id(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(
        entity_type: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            entity_type,
            field,
            value: value.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Auth(err) => {
                if err.is_unauthorized() {
                    StatusCode::UNAUTHORIZED
                } else {
                    match err {
                        sp_auth::AuthError::InvalidInput
                        | sp_auth::AuthError::Configuration(_) => StatusCode::BAD_REQUEST,
                        _ => StatusCode::INTERNAL_SERVER_ERROR,
                    }
                }
            }
            Self::Storage(err) => match err {
                sp_storage::StorageError::NotFound { .. }
                | sp_storage::StorageError::NotFoundByName { .. } => StatusCode::NOT_FOUND,
                sp_storage::StorageError::Duplicate { .. } => StatusCode::CONFLICT,
                sp_storage::StorageError::InvalidData(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::BadRequest(_) => "bad_request",
            Self::Validation(_) => "validation_error",
            Self::Unauthorized => "unauthorized",
            Self::Auth(err) => {
                if err.is_unauthorized() {
                    "unauthorized"
                } else {
                    match err {
                        sp_auth::AuthError::InvalidInput
                        | sp_auth::AuthError::Configuration(_) => "bad_request",
                        _ => "internal_error",
                    }
                }
            }
            Self::Storage(_) => "storage_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Returns the message exposed to clients.
    ///
    /// Authentication and internal errors get a fixed generic message;
    /// everything else shows the error text.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized => "Authentication failed".to_string(),
            Self::Auth(err) => {
                if err.is_unauthorized()
                    || matches!(
                        err,
                        sp_auth::AuthError::InvalidInput | sp_auth::AuthError::Configuration(_)
                    )
                {
                    err.to_string()
                } else {
                    "Internal server error".to_string()
                }
            }
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sp_auth::AuthError> for ApiError {
    fn from(err: sp_auth::AuthError) -> Self {
        Self::Auth(err)
    }
}

/// API error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error: String,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.public_message()),
            details: None,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_error() {
        let err = ApiError::not_found("DirectoryConfig", "corp-ldap");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "not_found");
        assert!(err.to_string().contains("DirectoryConfig"));
    }

    #[test]
    fn conflict_error() {
        let err = ApiError::conflict("DirectoryConfig", "name", "corp-ldap");
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "conflict");
    }

    #[test]
    fn auth_errors_map_to_unauthorized() {
        for err in [
            sp_auth::AuthError::InvalidCredentials,
            sp_auth::AuthError::InvalidToken,
            sp_auth::AuthError::InvalidRefreshToken,
        ] {
            let api = ApiError::from(err);
            assert_eq!(api.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(api.error_code(), "unauthorized");
        }
    }

    #[test]
    fn internal_message_is_generic() {
        let err = ApiError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn storage_error_mapping() {
        let storage_err = sp_storage::StorageError::not_found("User", Uuid::nil());
        let api_err = ApiError::from(storage_err);
        assert_eq!(api_err.status_code(), StatusCode::NOT_FOUND);
    }
}
