//! Directory configuration storage provider trait.

use async_trait::async_trait;
use sp_model::DirectoryConfig;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for directory configuration storage operations.
///
/// At most one configuration carries the default flag at a time; marking a
/// configuration as default clears the flag on every other row.
#[async_trait]
pub trait DirectoryConfigProvider: Send + Sync {
    /// Creates a new directory configuration.
    ///
    /// If `config.is_default` is set, clears the default flag on all other
    /// configurations.
    async fn create(&self, config: &DirectoryConfig) -> StorageResult<()>;

    /// Updates an existing directory configuration.
    ///
    /// If `config.is_default` is set, clears the default flag on all other
    /// configurations.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the configuration doesn't exist.
    async fn update(&self, config: &DirectoryConfig) -> StorageResult<()>;

    /// Deletes a directory configuration by ID.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the configuration doesn't exist.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// Gets a directory configuration by ID.
    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<DirectoryConfig>>;

    /// Gets the configuration currently marked as default, if any.
    async fn get_default(&self) -> StorageResult<Option<DirectoryConfig>>;

    /// Lists all directory configurations ordered by name.
    async fn list(&self) -> StorageResult<Vec<DirectoryConfig>>;
}
