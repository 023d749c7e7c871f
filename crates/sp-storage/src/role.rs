//! Role storage provider trait.

use async_trait::async_trait;
use sp_model::{Permission, Role, RoleSource};
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for role and role-assignment storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    /// Creates a new role.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a role with the same name exists.
    async fn create(&self, role: &Role) -> StorageResult<()>;

    /// Deletes a role by ID.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the role doesn't exist.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// Gets a role by ID.
    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<Role>>;

    /// Gets a role by name.
    async fn get_by_name(&self, name: &str) -> StorageResult<Option<Role>>;

    /// Lists all roles ordered by name.
    async fn list(&self) -> StorageResult<Vec<Role>>;

    /// Gets the roles granted to a user (any source).
    async fn get_user_roles(&self, user_id: Uuid) -> StorageResult<Vec<Role>>;

    /// Grants a role to a user with the given source.
    async fn grant(&self, user_id: Uuid, role_id: Uuid, source: RoleSource) -> StorageResult<()>;

    /// Revokes a role from a user.
    async fn revoke(&self, user_id: Uuid, role_id: Uuid) -> StorageResult<()>;

    /// Gets the permissions attached to a role.
    async fn get_permissions(&self, role_id: Uuid) -> StorageResult<Vec<Permission>>;
}
