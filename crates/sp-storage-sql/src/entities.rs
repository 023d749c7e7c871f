//! Database entity types for `SQLx`.
//!
//! These types map directly to database rows and are converted
//! to/from domain models.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for users.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub directory_config_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for roles.
#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for permissions.
#[derive(Debug, Clone, FromRow)]
pub struct PermissionRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Database row for directory configurations.
#[derive(Debug, Clone, FromRow)]
#[allow(clippy::struct_excessive_bools)]
pub struct DirectoryConfigRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub host: String,
    pub port: i32,
    pub base_dn: String,
    pub bind_dn: String,
    pub bind_credentials: String,
    pub search_filter: String,
    pub is_default: bool,
    pub is_active: bool,
    pub use_tls: bool,
    pub tls_cert_path: Option<String>,
    pub username_suffix: Option<String>,
    pub attribute_map: sqlx::types::Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for directory role mappings.
#[derive(Debug, Clone, FromRow)]
pub struct RoleMappingRow {
    pub id: Uuid,
    pub directory_config_id: Uuid,
    pub role_id: Uuid,
    pub group_dn: String,
    pub group_name: String,
    pub mapping_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Joined row of a role mapping and its target role.
#[derive(Debug, Clone, FromRow)]
pub struct MappingWithRoleRow {
    pub id: Uuid,
    pub directory_config_id: Uuid,
    pub role_id: Uuid,
    pub group_dn: String,
    pub group_name: String,
    pub mapping_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub role_name: String,
    pub role_description: Option<String>,
    pub role_created_at: DateTime<Utc>,
    pub role_updated_at: DateTime<Utc>,
}

/// Database row for audit events.
#[derive(Debug, Clone, FromRow)]
pub struct AuditEventRow {
    pub id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub old_values: Option<sqlx::types::Json<serde_json::Value>>,
    pub new_values: Option<sqlx::types::Json<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
}
