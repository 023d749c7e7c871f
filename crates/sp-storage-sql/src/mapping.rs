//! `PostgreSQL` implementation of the role mapping provider.

use async_trait::async_trait;
use sp_model::mapping::WILDCARD_CONFIG_ID;
use sp_model::{DirectoryRoleMapping, Role};
use sp_storage::RoleMappingProvider;
use sp_storage::error::{StorageError, StorageResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{MappingWithRoleRow, RoleMappingRow};
use crate::error::{from_sqlx_error, not_found};

/// `PostgreSQL` role mapping provider.
pub struct PgRoleMappingProvider {
    pool: PgPool,
}

impl PgRoleMappingProvider {
    /// Creates a new `PostgreSQL` role mapping provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleMappingProvider for PgRoleMappingProvider {
    async fn create(&self, mapping: &DirectoryRoleMapping) -> StorageResult<()> {
        sqlx::query(
            r"INSERT INTO directory_role_mappings (
                id, directory_config_id, role_id, group_dn, group_name,
                mapping_type, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(mapping.id)
        .bind(mapping.directory_config_id)
        .bind(mapping.role_id)
        .bind(&mapping.group_dn)
        .bind(&mapping.group_name)
        .bind(mapping.mapping_type.as_str())
        .bind(mapping.created_at)
        .bind(mapping.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match from_sqlx_error(e) {
            StorageError::Internal(msg) if msg.starts_with("Duplicate") => {
                StorageError::duplicate("DirectoryRoleMapping", "group_dn", &mapping.group_dn)
            }
            other => other,
        })?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM directory_role_mappings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(not_found("DirectoryRoleMapping", id));
        }

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<DirectoryRoleMapping>> {
        let row: Option<RoleMappingRow> =
            sqlx::query_as("SELECT * FROM directory_role_mappings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        Ok(row.map(DirectoryRoleMapping::from))
    }

    async fn list_for_config(
        &self,
        config_id: Uuid,
    ) -> StorageResult<Vec<(DirectoryRoleMapping, Role)>> {
        let rows: Vec<MappingWithRoleRow> = sqlx::query_as(
            r"SELECT m.id, m.directory_config_id, m.role_id, m.group_dn,
                m.group_name, m.mapping_type, m.created_at, m.updated_at,
                r.name AS role_name, r.description AS role_description,
                r.created_at AS role_created_at, r.updated_at AS role_updated_at
            FROM directory_role_mappings m
            JOIN roles r ON r.id = m.role_id
            WHERE m.directory_config_id = $1 OR m.directory_config_id = $2
            ORDER BY m.group_name",
        )
        .bind(config_id)
        .bind(WILDCARD_CONFIG_ID)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(rows.into_iter().map(MappingWithRoleRow::split).collect())
    }

    async fn list(&self) -> StorageResult<Vec<DirectoryRoleMapping>> {
        let rows: Vec<RoleMappingRow> =
            sqlx::query_as("SELECT * FROM directory_role_mappings ORDER BY group_name")
                .fetch_all(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        Ok(rows.into_iter().map(DirectoryRoleMapping::from).collect())
    }
}
