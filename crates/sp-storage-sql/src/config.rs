//! `PostgreSQL` implementation of the directory configuration provider.

use async_trait::async_trait;
use sp_model::DirectoryConfig;
use sp_storage::DirectoryConfigProvider;
use sp_storage::error::{StorageError, StorageResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::DirectoryConfigRow;
use crate::error::{from_sqlx_error, not_found};

/// `PostgreSQL` directory configuration provider.
pub struct PgDirectoryConfigProvider {
    pool: PgPool,
}

impl PgDirectoryConfigProvider {
    /// Creates a new `PostgreSQL` directory configuration provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Clears the default flag on every configuration except `keep`.
    async fn clear_other_defaults(&self, keep: Uuid) -> StorageResult<()> {
        sqlx::query("UPDATE directory_configs SET is_default = false WHERE id <> $1")
            .bind(keep)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(())
    }
}

#[async_trait]
impl DirectoryConfigProvider for PgDirectoryConfigProvider {
    async fn create(&self, config: &DirectoryConfig) -> StorageResult<()> {
        // Unset competing defaults before the row exists, so no two
        // configurations ever carry the flag at once
        if config.is_default {
            self.clear_other_defaults(config.id).await?;
        }

        sqlx::query(
            r"INSERT INTO directory_configs (
                id, name, description, host, port, base_dn, bind_dn,
                bind_credentials, search_filter, is_default, is_active,
                use_tls, tls_cert_path, username_suffix, attribute_map,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(config.id)
        .bind(&config.name)
        .bind(&config.description)
        .bind(&config.host)
        .bind(i32::from(config.port))
        .bind(&config.base_dn)
        .bind(&config.bind_dn)
        .bind(&config.bind_credentials)
        .bind(&config.search_filter)
        .bind(config.is_default)
        .bind(config.is_active)
        .bind(config.use_tls)
        .bind(&config.tls_cert_path)
        .bind(&config.username_suffix)
        .bind(sqlx::types::Json(&config.attribute_map))
        .bind(config.created_at)
        .bind(config.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match from_sqlx_error(e) {
            StorageError::Internal(msg) if msg.starts_with("Duplicate") => {
                StorageError::duplicate("DirectoryConfig", "name", &config.name)
            }
            other => other,
        })?;

        Ok(())
    }

    async fn update(&self, config: &DirectoryConfig) -> StorageResult<()> {
        if config.is_default {
            self.clear_other_defaults(config.id).await?;
        }

        let result = sqlx::query(
            r"UPDATE directory_configs SET
                name = $2, description = $3, host = $4, port = $5,
                base_dn = $6, bind_dn = $7, bind_credentials = $8,
                search_filter = $9, is_default = $10, is_active = $11,
                use_tls = $12, tls_cert_path = $13, username_suffix = $14,
                attribute_map = $15, updated_at = $16
            WHERE id = $1",
        )
        .bind(config.id)
        .bind(&config.name)
        .bind(&config.description)
        .bind(&config.host)
        .bind(i32::from(config.port))
        .bind(&config.base_dn)
        .bind(&config.bind_dn)
        .bind(&config.bind_credentials)
        .bind(&config.search_filter)
        .bind(config.is_default)
        .bind(config.is_active)
        .bind(config.use_tls)
        .bind(&config.tls_cert_path)
        .bind(&config.username_suffix)
        .bind(sqlx::types::Json(&config.attribute_map))
        .bind(config.updated_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(not_found("DirectoryConfig", config.id));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM directory_configs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(not_found("DirectoryConfig", id));
        }

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<DirectoryConfig>> {
        let row: Option<DirectoryConfigRow> =
            sqlx::query_as("SELECT * FROM directory_configs WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        Ok(row.map(DirectoryConfig::from))
    }

    async fn get_default(&self) -> StorageResult<Option<DirectoryConfig>> {
        let row: Option<DirectoryConfigRow> = sqlx::query_as(
            "SELECT * FROM directory_configs WHERE is_default = true ORDER BY updated_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(row.map(DirectoryConfig::from))
    }

    async fn list(&self) -> StorageResult<Vec<DirectoryConfig>> {
        let rows: Vec<DirectoryConfigRow> =
            sqlx::query_as("SELECT * FROM directory_configs ORDER BY name")
                .fetch_all(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        Ok(rows.into_iter().map(DirectoryConfig::from).collect())
    }
}
