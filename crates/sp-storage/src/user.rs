//! User storage provider trait.

use async_trait::async_trait;
use sp_model::User;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for user storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Creates a new user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a user with the same username
    /// or email exists.
    async fn create(&self, user: &User) -> StorageResult<()>;

    /// Updates an existing user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn update(&self, user: &User) -> StorageResult<()>;

    /// Deletes a user by ID.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// Gets a user by ID.
    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<User>>;

    /// Gets a user by username.
    async fn get_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Lists all users ordered by username.
    async fn list(&self) -> StorageResult<Vec<User>>;
}
