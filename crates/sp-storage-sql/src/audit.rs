//! `PostgreSQL` implementation of the audit provider.

use async_trait::async_trait;
use sp_model::AuditEvent;
use sp_storage::AuditProvider;
use sp_storage::error::StorageResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AuditEventRow;
use crate::error::from_sqlx_error;

/// `PostgreSQL` audit provider.
pub struct PgAuditProvider {
    pool: PgPool,
}

impl PgAuditProvider {
    /// Creates a new `PostgreSQL` audit provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditProvider for PgAuditProvider {
    async fn record(&self, event: &AuditEvent) -> StorageResult<()> {
        sqlx::query(
            r"INSERT INTO audit_events (
                id, action, entity_type, entity_id, old_values, new_values, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(event.id)
        .bind(event.action.as_str())
        .bind(&event.entity_type)
        .bind(&event.entity_id)
        .bind(event.old_values.as_ref().map(sqlx::types::Json))
        .bind(event.new_values.as_ref().map(sqlx::types::Json))
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(())
    }

    async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: Uuid,
    ) -> StorageResult<Vec<AuditEvent>> {
        let rows: Vec<AuditEventRow> = sqlx::query_as(
            r"SELECT * FROM audit_events
            WHERE entity_type = $1 AND entity_id = $2
            ORDER BY created_at DESC",
        )
        .bind(entity_type)
        .bind(entity_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(rows.into_iter().map(AuditEvent::from).collect())
    }
}
