//! `PostgreSQL` implementation of the role storage provider.

use async_trait::async_trait;
use sp_model::{Permission, Role, RoleSource};
use sp_storage::RoleProvider;
use sp_storage::error::{StorageError, StorageResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{PermissionRow, RoleRow};
use crate::error::{from_sqlx_error, not_found};

/// `PostgreSQL` role storage provider.
pub struct PgRoleProvider {
    pool: PgPool,
}

impl PgRoleProvider {
    /// Creates a new `PostgreSQL` role provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleProvider for PgRoleProvider {
    async fn create(&self, role: &Role) -> StorageResult<()> {
        sqlx::query(
            r"INSERT INTO roles (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.created_at)
        .bind(role.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match from_sqlx_error(e) {
            StorageError::Internal(msg) if msg.starts_with("Duplicate") => {
                StorageError::duplicate("Role", "name", &role.name)
            }
            other => other,
        })?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        // Assignments and mappings referencing the role are deleted by cascade
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(not_found("Role", id));
        }

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<Role>> {
        let row: Option<RoleRow> = sqlx::query_as("SELECT * FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(row.map(Role::from))
    }

    async fn get_by_name(&self, name: &str) -> StorageResult<Option<Role>> {
        let row: Option<RoleRow> = sqlx::query_as("SELECT * FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(row.map(Role::from))
    }

    async fn list(&self) -> StorageResult<Vec<Role>> {
        let rows: Vec<RoleRow> = sqlx::query_as("SELECT * FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    async fn get_user_roles(&self, user_id: Uuid) -> StorageResult<Vec<Role>> {
        let rows: Vec<RoleRow> = sqlx::query_as(
            r"SELECT r.* FROM roles r
            JOIN user_roles ur ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(rows.into_iter().map(Role::from).collect())
    }

    async fn grant(&self, user_id: Uuid, role_id: Uuid, source: RoleSource) -> StorageResult<()> {
        sqlx::query(
            r"INSERT INTO user_roles (id, user_id, role_id, source, created_at)
            VALUES ($1, $2, $3, $4, now())
            ON CONFLICT (user_id, role_id) DO NOTHING",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(role_id)
        .bind(source.as_str())
        .execute(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(())
    }

    async fn revoke(&self, user_id: Uuid, role_id: Uuid) -> StorageResult<()> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(())
    }

    async fn get_permissions(&self, role_id: Uuid) -> StorageResult<Vec<Permission>> {
        let rows: Vec<PermissionRow> = sqlx::query_as(
            r"SELECT p.* FROM permissions p
            JOIN role_permissions rp ON p.id = rp.permission_id
            WHERE rp.role_id = $1
            ORDER BY p.name",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }
}
