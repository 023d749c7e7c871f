//! Conversion between database entities and domain models.

use sp_model::{
    AttributeMap, AuditAction, AuditEvent, DirectoryConfig, DirectoryRoleMapping, MappingType,
    Permission, Role, User,
};

use crate::entities::{
    AuditEventRow, DirectoryConfigRow, MappingWithRoleRow, PermissionRow, RoleMappingRow, RoleRow,
    UserRow,
};

impl MappingWithRoleRow {
    /// Splits the joined row into the mapping and its target role.
    pub fn split(self) -> (DirectoryRoleMapping, Role) {
        let role = Role {
            id: self.role_id,
            name: self.role_name,
            description: self.role_description,
            created_at: self.role_created_at,
            updated_at: self.role_updated_at,
        };
        let mapping = DirectoryRoleMapping::from(RoleMappingRow {
            id: self.id,
            directory_config_id: self.directory_config_id,
            role_id: self.role_id,
            group_dn: self.group_dn,
            group_name: self.group_name,
            mapping_type: self.mapping_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        });
        (mapping, role)
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            display_name: row.display_name,
            is_active: row.is_active,
            last_login_at: row.last_login_at,
            directory_config_id: row.directory_config_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<PermissionRow> for Permission {
    fn from(row: PermissionRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

impl From<DirectoryConfigRow> for DirectoryConfig {
    fn from(row: DirectoryConfigRow) -> Self {
        let attribute_map: AttributeMap =
            serde_json::from_value(row.attribute_map.0).unwrap_or_default();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let port = row.port as u16;

        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            host: row.host,
            port,
            base_dn: row.base_dn,
            bind_dn: row.bind_dn,
            bind_credentials: row.bind_credentials,
            search_filter: row.search_filter,
            is_default: row.is_default,
            is_active: row.is_active,
            use_tls: row.use_tls,
            tls_cert_path: row.tls_cert_path,
            username_suffix: row.username_suffix,
            attribute_map,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<RoleMappingRow> for DirectoryRoleMapping {
    fn from(row: RoleMappingRow) -> Self {
        let mapping_type = MappingType::parse(&row.mapping_type).unwrap_or_default();

        Self {
            id: row.id,
            directory_config_id: row.directory_config_id,
            role_id: row.role_id,
            group_dn: row.group_dn,
            group_name: row.group_name,
            mapping_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<AuditEventRow> for AuditEvent {
    fn from(row: AuditEventRow) -> Self {
        let action = match row.action.as_str() {
            "CREATED" => AuditAction::Created,
            "DELETED" => AuditAction::Deleted,
            _ => AuditAction::Updated,
        };

        Self {
            id: row.id,
            action,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            old_values: row.old_values.map(|v| v.0),
            new_values: row.new_values.map(|v| v.0),
            created_at: row.created_at,
        }
    }
}
