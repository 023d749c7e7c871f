//! Audit trail storage provider trait.

use async_trait::async_trait;
use sp_model::AuditEvent;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for recording and querying audit events.
///
/// Recording failures propagate to the caller. Reconciliation writes its
/// audit event inside the same transaction as the user and role changes,
/// so a failed write rolls the whole login back.
#[async_trait]
pub trait AuditProvider: Send + Sync {
    /// Records an audit event.
    async fn record(&self, event: &AuditEvent) -> StorageResult<()>;

    /// Lists events for an entity, newest first.
    async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> StorageResult<Vec<AuditEvent>>;
}
