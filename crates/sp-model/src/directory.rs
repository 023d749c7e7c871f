//! Directory (LDAP) configuration and directory-sourced user state.
//!
//! A [`DirectoryConfig`] describes one LDAP server. At most one
//! configuration is flagged default at a time; the flag is maintained by
//! unmarking the others when a new default is written, which is a
//! read-then-write sequence and not atomic under concurrent writers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// Attribute map
// ============================================================================

/// Configurable directory attribute names used when mapping entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeMap {
    /// Attribute holding the display name.
    pub display_name: String,
    /// Attribute holding the email address.
    pub email: String,
    /// Attribute holding the stable object identifier.
    pub user_id: String,
    /// Attribute holding the login name.
    pub username: String,
}

impl Default for AttributeMap {
    fn default() -> Self {
        Self {
            display_name: "displayName".to_string(),
            email: "mail".to_string(),
            user_id: "objectGUID".to_string(),
            username: "sAMAccountName".to_string(),
        }
    }
}

// ============================================================================
// Directory configuration
// ============================================================================

/// Configuration for one LDAP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Unique identifier.
    pub id: Uuid,
    /// Configuration name (unique).
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Base DN for user searches.
    pub base_dn: String,
    /// Bind DN for the service account.
    pub bind_dn: String,
    /// Bind credential (password). Never serialized.
    #[serde(skip_serializing, default)]
    pub bind_credentials: String,
    /// Search filter for locating users (e.g. `(sAMAccountName={{username}})`).
    pub search_filter: String,
    /// Whether this is the default configuration.
    pub is_default: bool,
    /// Whether this configuration may be used for logins.
    pub is_active: bool,
    /// Whether to connect over TLS (`ldaps://`).
    pub use_tls: bool,
    /// Path to a PEM certificate used as the trust anchor when TLS is on.
    pub tls_cert_path: Option<String>,
    /// Suffix appended to the bind identity (e.g. `@example.com`).
    pub username_suffix: Option<String>,
    /// Attribute names used when mapping entries.
    pub attribute_map: AttributeMap,
    /// When the configuration was created.
    pub created_at: DateTime<Utc>,
    /// When the configuration was last updated.
    pub updated_at: DateTime<Utc>,
}

impl DirectoryConfig {
    /// Creates a new active, non-default configuration.
    #[must_use]
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            host: host.into(),
            port,
            base_dn: String::new(),
            bind_dn: String::new(),
            bind_credentials: String::new(),
            search_filter: "(sAMAccountName={{username}})".to_string(),
            is_default: false,
            is_active: true,
            use_tls: false,
            tls_cert_path: None,
            username_suffix: None,
            attribute_map: AttributeMap::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the base DN.
    #[must_use]
    pub fn with_base_dn(mut self, dn: impl Into<String>) -> Self {
        self.base_dn = dn.into();
        self
    }

    /// Sets the bind DN and credential.
    #[must_use]
    pub fn with_bind(mut self, dn: impl Into<String>, credential: impl Into<String>) -> Self {
        self.bind_dn = dn.into();
        self.bind_credentials = credential.into();
        self
    }

    /// Sets the search filter.
    #[must_use]
    pub fn with_search_filter(mut self, filter: impl Into<String>) -> Self {
        self.search_filter = filter.into();
        self
    }

    /// Marks the configuration as default.
    #[must_use]
    pub const fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    /// Enables TLS with an optional trust-anchor certificate path.
    #[must_use]
    pub fn with_tls(mut self, cert_path: Option<String>) -> Self {
        self.use_tls = true;
        self.tls_cert_path = cert_path;
        self
    }

    /// Sets the username suffix appended to bind identities.
    #[must_use]
    pub fn with_username_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.username_suffix = Some(suffix.into());
        self
    }

    /// Checks that all fields required for a connection are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.host.is_empty()
            && self.port != 0
            && !self.base_dn.is_empty()
            && !self.bind_dn.is_empty()
            && !self.bind_credentials.is_empty()
    }
}

// ============================================================================
// Directory detail
// ============================================================================

/// Directory-sourced metadata for a user, overwritten on each login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryDetail {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Configuration the data came from.
    pub directory_config_id: Uuid,
    /// Distinguished name of the entry.
    pub distinguished_name: String,
    /// Stable object identifier from the directory.
    pub object_guid: String,
    /// Group DNs the entry is a member of.
    pub groups: Vec<String>,
    /// When the entry was last synchronized.
    pub last_sync_at: DateTime<Utc>,
    /// Raw directory attributes as returned by the server.
    pub raw_data: Value,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl DirectoryDetail {
    /// Creates a new detail record for a user.
    #[must_use]
    pub fn new(user_id: Uuid, directory_config_id: Uuid, dn: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            directory_config_id,
            distinguished_name: dn.into(),
            object_guid: String::new(),
            groups: Vec::new(),
            last_sync_at: now,
            raw_data: Value::Object(serde_json::Map::new()),
            created_at: now,
            updated_at: now,
        }
    }
}

// ============================================================================
// Canonical directory user
// ============================================================================

/// A directory entry mapped to the canonical profile shape.
///
/// This is the interchange type between the attribute mapper and the
/// reconciler: it carries everything reconciliation needs and nothing
/// protocol-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryUser {
    /// Stable identifier (object GUID, falling back to the DN).
    pub id: String,
    /// Login name.
    pub username: String,
    /// Display name, when the directory provides one.
    pub display_name: Option<String>,
    /// Email address, when the directory provides one.
    pub email: Option<String>,
    /// Distinguished name of the entry.
    pub dn: String,
    /// Group DNs the entry is a member of.
    pub groups: Vec<String>,
    /// Raw attributes as returned by the server.
    pub raw: Value,
}

impl DirectoryUser {
    /// Returns the display name, falling back to the username.
    #[must_use]
    pub fn display_name_or_username(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_map_defaults() {
        let map = AttributeMap::default();
        assert_eq!(map.display_name, "displayName");
        assert_eq!(map.email, "mail");
        assert_eq!(map.user_id, "objectGUID");
        assert_eq!(map.username, "sAMAccountName");
    }

    #[test]
    fn config_completeness() {
        let incomplete = DirectoryConfig::new("corp", "ldap.example.com", 389);
        assert!(!incomplete.is_complete());

        let complete = incomplete
            .with_base_dn("dc=example,dc=com")
            .with_bind("cn=svc,dc=example,dc=com", "secret");
        assert!(complete.is_complete());
    }

    #[test]
    fn bind_credentials_not_serialized() {
        let config = DirectoryConfig::new("corp", "ldap.example.com", 389)
            .with_bind("cn=svc,dc=example,dc=com", "secret");

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("bind_credentials"));
    }

    #[test]
    fn directory_user_display_name_fallback() {
        let user = DirectoryUser {
            id: "guid-1".to_string(),
            username: "jdoe".to_string(),
            display_name: None,
            email: None,
            dn: "cn=jdoe,ou=users,dc=example,dc=com".to_string(),
            groups: vec![],
            raw: Value::Null,
        };

        assert_eq!(user.display_name_or_username(), "jdoe");
    }
}
