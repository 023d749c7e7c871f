//! Transactional reconciliation of directory users into local storage.
//!
//! Reconciliation runs entirely inside one database transaction: the user
//! upsert, the directory-detail refresh, and the role-assignment
//! replacement either all land or none do.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sp_model::mapping::{WILDCARD_CONFIG_ID, resolve_roles};
use sp_model::{AuditEvent, DEFAULT_ROLE_NAME, DirectoryUser, Role, RoleSource, User};
use sp_storage::error::StorageResult;
use sp_storage::{DirectoryReconciler, ReconcileOutcome};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entities::{MappingWithRoleRow, RoleRow, UserRow};
use crate::error::from_sqlx_error;

/// `PostgreSQL` directory reconciler.
pub struct PgDirectoryReconciler {
    pool: PgPool,
}

impl PgDirectoryReconciler {
    /// Creates a new `PostgreSQL` directory reconciler.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryReconciler for PgDirectoryReconciler {
    async fn reconcile(
        &self,
        directory_user: &DirectoryUser,
        config_id: Uuid,
    ) -> StorageResult<ReconcileOutcome> {
        let mut tx = self.pool.begin().await.map_err(from_sqlx_error)?;

        match run(&mut tx, directory_user, config_id).await {
            Ok(outcome) => {
                tx.commit().await.map_err(from_sqlx_error)?;
                Ok(outcome)
            }
            Err(err) => {
                // Rollback failures are secondary to the original error
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "rollback failed during reconciliation");
                }
                Err(err)
            }
        }
    }
}

async fn run(
    tx: &mut Transaction<'_, Postgres>,
    directory_user: &DirectoryUser,
    config_id: Uuid,
) -> StorageResult<ReconcileOutcome> {
    let existing: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(&directory_user.username)
        .fetch_optional(&mut **tx)
        .await
        .map_err(from_sqlx_error)?;

    let now = Utc::now();
    let created = existing.is_none();
    let old_snapshot = existing
        .as_ref()
        .map(|row| serde_json::to_value(User::from(row.clone())).unwrap_or(Value::Null));

    let user = match existing {
        Some(row) => {
            let mut user = User::from(row);
            user.display_name = directory_user.display_name.clone();
            user.email = directory_user.email.clone();
            user.last_login_at = Some(now);
            user.directory_config_id = Some(config_id);
            user.updated_at = now;

            sqlx::query(
                r"UPDATE users SET
                    display_name = $2, email = $3, last_login_at = $4,
                    directory_config_id = $5, updated_at = $6
                WHERE id = $1",
            )
            .bind(user.id)
            .bind(&user.display_name)
            .bind(&user.email)
            .bind(user.last_login_at)
            .bind(user.directory_config_id)
            .bind(user.updated_at)
            .execute(&mut **tx)
            .await
            .map_err(from_sqlx_error)?;

            user
        }
        None => {
            let mut user = User::new(&directory_user.username).with_directory_config(config_id);
            user.display_name = directory_user.display_name.clone();
            user.email = directory_user.email.clone();
            user.last_login_at = Some(now);

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
            .execute(&mut **tx)
            .await
            .map_err(from_sqlx_error)?;

            user
        }
    };

    upsert_detail(tx, &user, directory_user, config_id).await?;

    // Role resolution against config-scoped and wildcard mappings.
    // An empty group list resolves empty without touching the table.
    let resolved = if directory_user.groups.is_empty() {
        Vec::new()
    } else {
        let pairs = load_mappings(tx, config_id).await?;
        resolve_roles(&pairs, &directory_user.groups)
    };

    if resolved.is_empty() {
        if created {
            assign_default_role(tx, user.id).await?;
        }
    } else {
        replace_directory_assignments(tx, user.id, &resolved).await?;
    }

    let roles = effective_roles(tx, user.id).await?;

    let new_snapshot = serde_json::to_value(&user).unwrap_or(Value::Null);
    let event = match old_snapshot {
        Some(old) => AuditEvent::update("user", user.id.to_string(), old, new_snapshot),
        None => AuditEvent::creation("user", user.id.to_string(), new_snapshot),
    };
    record_audit(tx, &event).await?;

    debug!(
        username = %user.username,
        created,
        role_count = roles.len(),
        "reconciled directory user"
    );

    Ok(ReconcileOutcome {
        user,
        roles,
        created,
    })
}

/// Upserts the single directory-detail row for a user (last write wins).
async fn upsert_detail(
    tx: &mut Transaction<'_, Postgres>,
    user: &User,
    directory_user: &DirectoryUser,
    config_id: Uuid,
) -> StorageResult<()> {
    sqlx::query(
        r"INSERT INTO user_directory_details (
            id, user_id, directory_config_id, distinguished_name,
            object_guid, groups, last_sync_at, raw_data, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        ON CONFLICT (user_id) DO UPDATE SET
            directory_config_id = EXCLUDED.directory_config_id,
            distinguished_name = EXCLUDED.distinguished_name,
            object_guid = EXCLUDED.object_guid,
            groups = EXCLUDED.groups,
            last_sync_at = EXCLUDED.last_sync_at,
            raw_data = EXCLUDED.raw_data,
            updated_at = EXCLUDED.updated_at",
    )
    .bind(Uuid::now_v7())
    .bind(user.id)
    .bind(config_id)
    .bind(&directory_user.dn)
    .bind(&directory_user.id)
    .bind(sqlx::types::Json(&directory_user.groups))
    .bind(Utc::now())
    .bind(sqlx::types::Json(&directory_user.raw))
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(from_sqlx_error)?;

    Ok(())
}

async fn load_mappings(
    tx: &mut Transaction<'_, Postgres>,
    config_id: Uuid,
) -> StorageResult<Vec<(sp_model::DirectoryRoleMapping, Role)>> {
    let rows: Vec<MappingWithRoleRow> = sqlx::query_as(
        r"SELECT m.id, m.directory_config_id, m.role_id, m.group_dn,
            m.group_name, m.mapping_type, m.created_at, m.updated_at,
            r.name AS role_name, r.description AS role_description,
            r.created_at AS role_created_at, r.updated_at AS role_updated_at
        FROM directory_role_mappings m
        JOIN roles r ON r.id = m.role_id
        WHERE m.directory_config_id = $1 OR m.directory_config_id = $2",
    )
    .bind(config_id)
    .bind(WILDCARD_CONFIG_ID)
    .fetch_all(&mut **tx)
    .await
    .map_err(from_sqlx_error)?;

    Ok(rows.into_iter().map(MappingWithRoleRow::split).collect())
}

/// Replaces all directory-sourced role assignments with the resolved set.
///
/// Manual assignments are untouched; a manual grant of a resolved role
/// takes precedence over the incoming directory row.
async fn replace_directory_assignments(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    resolved: &[Role],
) -> StorageResult<()> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND source = $2")
        .bind(user_id)
        .bind(RoleSource::DirectoryMapping.as_str())
        .execute(&mut **tx)
        .await
        .map_err(from_sqlx_error)?;

    for role in resolved {
        sqlx::query(
            r"INSERT INTO user_roles (id, user_id, role_id, source, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, role_id) DO NOTHING",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(role.id)
        .bind(RoleSource::DirectoryMapping.as_str())
        .bind(Utc::now())
        .execute(&mut **tx)
        .await
        .map_err(from_sqlx_error)?;
    }

    Ok(())
}

/// Grants the fallback role to a brand-new user whose groups resolved to
/// nothing. The grant is manual-sourced so later syncs don't remove it.
async fn assign_default_role(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> StorageResult<()> {
    let role: Option<RoleRow> = sqlx::query_as("SELECT * FROM roles WHERE name = $1")
        .bind(DEFAULT_ROLE_NAME)
        .fetch_optional(&mut **tx)
        .await
        .map_err(from_sqlx_error)?;

    let Some(role) = role else {
        warn!(role = DEFAULT_ROLE_NAME, "default role missing, new user has no roles");
        return Ok(());
    };

    sqlx::query(
        r"INSERT INTO user_roles (id, user_id, role_id, source, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, role_id) DO NOTHING",
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(role.id)
    .bind(RoleSource::Manual.as_str())
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .map_err(from_sqlx_error)?;

    Ok(())
}

async fn effective_roles(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> StorageResult<Vec<Role>> {
    let rows: Vec<RoleRow> = sqlx::query_as(
        r"SELECT r.* FROM roles r
        JOIN user_roles ur ON r.id = ur.role_id
        WHERE ur.user_id = $1
        ORDER BY r.name",
    )
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await
    .map_err(from_sqlx_error)?;

    Ok(rows.into_iter().map(Role::from).collect())
}

async fn record_audit(
    tx: &mut Transaction<'_, Postgres>,
    event: &AuditEvent,
) -> StorageResult<()> {
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
    .execute(&mut **tx)
    .await
    .map_err(from_sqlx_error)?;

    Ok(())
}
