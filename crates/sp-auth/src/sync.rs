//! Bulk directory synchronization.
//!
//! Walks every directory entry matching the user filter and pushes each
//! one through the same transactional reconciliation path as a login.
//! Per-entry failures are recorded and do not abort the run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sp_directory::{ConnectionParams, DirectoryClient, map_entry, resolve_configuration};
use sp_storage::{DirectoryConfigProvider, DirectoryReconciler};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::RoleCache;
use crate::error::{AuthError, AuthResult};

/// Outcome of one bulk synchronization run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Number of directory entries seen.
    pub total: usize,
    /// Users created.
    pub created: usize,
    /// Users updated.
    pub updated: usize,
    /// Entries that failed to reconcile.
    pub failed: usize,
    /// One message per failed entry.
    pub errors: Vec<String>,
}

/// Reconciles all directory entries in bulk.
pub struct DirectorySynchronizer {
    configs: Arc<dyn DirectoryConfigProvider>,
    reconciler: Arc<dyn DirectoryReconciler>,
    cache: Arc<dyn RoleCache>,
}

impl DirectorySynchronizer {
    /// Creates a synchronizer over the given collaborators.
    #[must_use]
    pub fn new(
        configs: Arc<dyn DirectoryConfigProvider>,
        reconciler: Arc<dyn DirectoryReconciler>,
        cache: Arc<dyn RoleCache>,
    ) -> Self {
        Self {
            configs,
            reconciler,
            cache,
        }
    }

    /// Runs one synchronization pass against a configuration (or the
    /// default one).
    ///
    /// # Errors
    ///
    /// Fails only when the configuration cannot be resolved or the
    /// directory cannot be listed; individual entry failures are
    /// tallied in the result instead.
    pub async fn sync(&self, config_id: Option<Uuid>) -> AuthResult<SyncResult> {
        let started_at = Utc::now();

        let config = resolve_configuration(self.configs.as_ref(), config_id)
            .await
            .map_err(|e| AuthError::config(e.to_string()))?;
        let config_id = config.id;
        let attribute_map = config.attribute_map.clone();
        let config_name = config.name.clone();

        let params =
            ConnectionParams::from_config(config).map_err(|e| AuthError::config(e.to_string()))?;
        let client = DirectoryClient::new(params);

        let entries = client
            .list_users()
            .await
            .map_err(|e| AuthError::Internal(format!("directory listing failed: {e}")))?;

        let mut result = SyncResult {
            started_at,
            finished_at: started_at,
            total: entries.len(),
            created: 0,
            updated: 0,
            failed: 0,
            errors: Vec::new(),
        };

        for entry in &entries {
            let directory_user = map_entry(entry, &attribute_map);
            let username = directory_user.username.clone();

            match self.reconciler.reconcile(&directory_user, config_id).await {
                Ok(outcome) => {
                    if outcome.created {
                        result.created += 1;
                    } else {
                        result.updated += 1;
                    }
                    let roles = outcome.roles.iter().map(|r| r.name.clone()).collect();
                    self.cache.put(outcome.user.id, roles);
                }
                Err(e) => {
                    warn!(username = %username, error = %e, "sync entry failed");
                    result.failed += 1;
                    result.errors.push(format!("{username}: {e}"));
                }
            }
        }

        result.finished_at = Utc::now();

        info!(
            config = %config_name,
            total = result.total,
            created = result.created,
            updated = result.updated,
            failed = result.failed,
            "directory synchronization finished"
        );

        Ok(result)
    }
}
