//! Role and permission domain model.
//!
//! Roles are granted to users either manually by an administrator or
//! automatically via directory group mappings. The two sources are kept
//! apart so that directory-sourced assignments can be wholesale replaced
//! on every login without disturbing manual grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the fallback role assigned to brand-new users whose directory
/// groups resolve to no mapped roles.
pub const DEFAULT_ROLE_NAME: &str = "user";

/// A portal role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier.
    pub id: Uuid,
    /// Role name (unique).
    pub name: String,
    /// Role description.
    pub description: Option<String>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
    /// When the role was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new role with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// A permission that can be attached to roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    /// Unique identifier.
    pub id: Uuid,
    /// Permission name (unique, e.g. `users:write`).
    pub name: String,
    /// Permission description.
    pub description: Option<String>,
    /// When the permission was created.
    pub created_at: DateTime<Utc>,
}

impl Permission {
    /// Creates a new permission with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            created_at: Utc::now(),
        }
    }
}

/// Origin of a role assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoleSource {
    /// Granted by an administrator.
    Manual,
    /// Derived from directory group membership.
    DirectoryMapping,
}

impl RoleSource {
    /// Returns the database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::DirectoryMapping => "directory-mapping",
        }
    }

    /// Parses the database representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(Self::Manual),
            "directory-mapping" => Some(Self::DirectoryMapping),
            _ => None,
        }
    }
}

/// A role granted to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Unique identifier.
    pub id: Uuid,
    /// User the role is granted to.
    pub user_id: Uuid,
    /// Granted role.
    pub role_id: Uuid,
    /// How the assignment came to be.
    pub source: RoleSource,
    /// When the assignment was created.
    pub created_at: DateTime<Utc>,
}

impl RoleAssignment {
    /// Creates a manual assignment.
    #[must_use]
    pub fn manual(user_id: Uuid, role_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            role_id,
            source: RoleSource::Manual,
            created_at: Utc::now(),
        }
    }

    /// Creates a directory-mapping assignment.
    #[must_use]
    pub fn from_directory(user_id: Uuid, role_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            role_id,
            source: RoleSource::DirectoryMapping,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_source_round_trip() {
        assert_eq!(RoleSource::Manual.as_str(), "manual");
        assert_eq!(RoleSource::DirectoryMapping.as_str(), "directory-mapping");
        assert_eq!(RoleSource::parse("manual"), Some(RoleSource::Manual));
        assert_eq!(
            RoleSource::parse("directory-mapping"),
            Some(RoleSource::DirectoryMapping)
        );
        assert_eq!(RoleSource::parse("ldap"), None);
    }

    #[test]
    fn assignment_constructors_set_source() {
        let user_id = Uuid::now_v7();
        let role_id = Uuid::now_v7();

        let manual = RoleAssignment::manual(user_id, role_id);
        assert_eq!(manual.source, RoleSource::Manual);

        let mapped = RoleAssignment::from_directory(user_id, role_id);
        assert_eq!(mapped.source, RoleSource::DirectoryMapping);
    }

    #[test]
    fn role_builder_works() {
        let role = Role::new("auditor").with_description("Read-only access");
        assert_eq!(role.name, "auditor");
        assert_eq!(role.description.as_deref(), Some("Read-only access"));
    }
}
