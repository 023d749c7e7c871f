//! Directory role-mapping storage provider trait.

use async_trait::async_trait;
use sp_model::{DirectoryRoleMapping, Role};
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for directory group-to-role mapping storage operations.
#[async_trait]
pub trait RoleMappingProvider: Send + Sync {
    /// Creates a new role mapping.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if an identical mapping already
    /// exists for the same configuration, group, and role.
    async fn create(&self, mapping: &DirectoryRoleMapping) -> StorageResult<()>;

    /// Deletes a role mapping by ID.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the mapping doesn't exist.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// Gets a role mapping by ID.
    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<DirectoryRoleMapping>>;

    /// Lists the mappings that apply to a directory configuration, together
    /// with the role each mapping targets.
    ///
    /// Includes wildcard mappings registered under the nil configuration ID,
    /// which apply to every directory.
    async fn list_for_config(
        &self,
        config_id: Uuid,
    ) -> StorageResult<Vec<(DirectoryRoleMapping, Role)>>;

    /// Lists all role mappings.
    async fn list(&self) -> StorageResult<Vec<DirectoryRoleMapping>>;
}
