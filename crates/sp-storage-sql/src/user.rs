//! `PostgreSQL` implementation of the user storage provider.

use async_trait::async_trait;
use sp_model::User;
use sp_storage::UserProvider;
use sp_storage::error::{StorageError, StorageResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserRow;
use crate::error::{from_sqlx_error, not_found};

/// `PostgreSQL` user storage provider.
pub struct PgUserProvider {
    pool: PgPool,
}

impl PgUserProvider {
    /// Creates a new `PostgreSQL` user provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserProvider for PgUserProvider {
    async fn create(&self, user: &User) -> StorageResult<()> {
        sqlx::query(
            r"INSERT INTO users (
                id, username, email, display_name, is_active,
                last_login_at, directory_config_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.is_active)
        .bind(user.last_login_at)
        .bind(user.directory_config_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match from_sqlx_error(e) {
            StorageError::Internal(msg) if msg.starts_with("Duplicate") => {
                StorageError::duplicate("User", "username", &user.username)
            }
            other => other,
        })?;

        Ok(())
    }

    async fn update(&self, user: &User) -> StorageResult<()> {
        let result = sqlx::query(
            r"UPDATE users SET
                username = $2, email = $3, display_name = $4, is_active = $5,
                last_login_at = $6, directory_config_id = $7, updated_at = $8
            WHERE id = $1",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(user.is_active)
        .bind(user.last_login_at)
        .bind(user.directory_config_id)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(not_found("User", user.id));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        // Role assignments and directory details are deleted by cascade
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(not_found("User", id));
        }

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(row.map(User::from))
    }

    async fn get_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(row.map(User::from))
    }

    async fn list(&self) -> StorageResult<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
