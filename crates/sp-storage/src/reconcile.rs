//! Directory user reconciliation trait.

use async_trait::async_trait;
use sp_model::{DirectoryUser, Role, User};
use uuid::Uuid;

use crate::error::StorageResult;

/// Result of reconciling a directory user into local storage.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// The local user record after reconciliation.
    pub user: User,
    /// The effective roles of the user after reconciliation, including
    /// manually granted roles that survive directory sync.
    pub roles: Vec<Role>,
    /// Whether the local user record was created by this reconciliation.
    pub created: bool,
}

/// Reconciles an authenticated directory user into local storage.
///
/// A single reconciliation atomically updates (or creates) the user record,
/// refreshes the stored directory detail, and replaces the user's
/// directory-sourced role assignments based on the configured group
/// mappings. Manually granted roles are never touched.
#[async_trait]
pub trait DirectoryReconciler: Send + Sync {
    /// Reconciles `directory_user` under the given directory configuration.
    ///
    /// ## Errors
    ///
    /// Any storage failure rolls back the whole reconciliation and leaves
    /// the previous user state intact.
    async fn reconcile(
        &self,
        directory_user: &DirectoryUser,
        config_id: Uuid,
    ) -> StorageResult<ReconcileOutcome>;
}
