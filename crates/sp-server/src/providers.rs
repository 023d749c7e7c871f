//! Storage provider wiring.
//!
//! Aggregates the PostgreSQL provider implementations behind one struct
//! so handlers can reach every storage concern through the app state.

use std::sync::Arc;

use sp_storage::{
    AuditProvider, DirectoryConfigProvider, DirectoryReconciler, RoleMappingProvider, RoleProvider,
    UserProvider,
};
use sp_storage_sql::{
    PgAuditProvider, PgDirectoryConfigProvider, PgDirectoryReconciler, PgRoleMappingProvider,
    PgRoleProvider, PgUserProvider,
};
use sqlx::PgPool;

/// All storage providers, backed by one connection pool.
#[derive(Clone)]
pub struct StorageProviders {
    /// User CRUD.
    pub users: Arc<dyn UserProvider>,
    /// Role CRUD and assignments.
    pub roles: Arc<dyn RoleProvider>,
    /// Directory configurations.
    pub configs: Arc<dyn DirectoryConfigProvider>,
    /// Group-to-role mappings.
    pub mappings: Arc<dyn RoleMappingProvider>,
    /// Audit trail.
    pub audit: Arc<dyn AuditProvider>,
    /// Transactional directory-user reconciliation.
    pub reconciler: Arc<dyn DirectoryReconciler>,
}

impl StorageProviders {
    /// Creates providers over the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PgUserProvider::new(pool.clone())),
            roles: Arc::new(PgRoleProvider::new(pool.clone())),
            configs: Arc::new(PgDirectoryConfigProvider::new(pool.clone())),
            mappings: Arc::new(PgRoleMappingProvider::new(pool.clone())),
            audit: Arc::new(PgAuditProvider::new(pool.clone())),
            reconciler: Arc::new(PgDirectoryReconciler::new(pool)),
        }
    }
}
