//! Request and response bodies for the HTTP API.
//!
//! The wire format is camelCase JSON. Directory configuration responses
//! never carry the bind credential.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sp_auth::{AuthSuccess, TokenPair};
use sp_model::{AttributeMap, DirectoryConfig, DirectoryRoleMapping, MappingType, User};
use uuid::Uuid;

// ============================================================================
// Authentication
// ============================================================================

/// Login request for both the directory and the local admin flow.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plaintext password, verified against the directory or the admin hash.
    pub password: String,
    /// Directory configuration to authenticate against; the default
    /// configuration is used when absent.
    #[serde(default)]
    pub directory_configuration_id: Option<Uuid>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field(
                "directory_configuration_id",
                &self.directory_configuration_id,
            )
            .finish()
    }
}

/// Issued tokens, as carried inside an [`AuthResponse`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token, when issued.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
        }
    }
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// Issued token pair.
    pub token: TokenResponse,
    /// Authenticated user id.
    pub user_id: Uuid,
    /// Login name.
    pub username: String,
    /// Display name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Email address, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Effective role names.
    pub roles: Vec<String>,
}

impl From<AuthSuccess> for AuthResponse {
    fn from(success: AuthSuccess) -> Self {
        Self {
            success: true,
            token: TokenResponse::from(success.tokens),
            user_id: success.user.id,
            username: success.user.username,
            display_name: success.user.display_name,
            email: success.user.email,
            roles: success.roles,
        }
    }
}

/// Token refresh request.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token issued at login.
    pub refresh_token: String,
}

impl std::fmt::Debug for RefreshRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshRequest")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Token refresh response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// Fresh access token.
    pub access_token: String,
    /// Rotated refresh token, only when rotation is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

impl From<TokenPair> for RefreshResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            success: true,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: pair.token_type,
            expires_in: pair.expires_in,
        }
    }
}

/// Authenticated user profile, from the verified access token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// User id (token subject).
    pub user_id: String,
    /// Login name.
    pub username: String,
    /// Email address, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Effective role names.
    pub roles: Vec<String>,
}

// ============================================================================
// Directory configurations
// ============================================================================

/// Request to create a directory configuration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirectoryConfigRequest {
    /// Configuration name (unique).
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Directory host.
    pub host: String,
    /// Directory port.
    pub port: u16,
    /// Search base DN.
    pub base_dn: String,
    /// Service bind DN.
    pub bind_dn: String,
    /// Service bind credential.
    pub bind_credentials: String,
    /// User search filter with a `{{username}}` placeholder.
    #[serde(default = "default_search_filter")]
    pub search_filter: String,
    /// Whether this configuration is the default.
    #[serde(default)]
    pub is_default: bool,
    /// Whether this configuration is active.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Whether to connect over TLS.
    #[serde(default)]
    pub use_tls: bool,
    /// Path to the trust-anchor certificate for TLS.
    #[serde(default)]
    pub tls_cert_path: Option<String>,
    /// Suffix appended to bare usernames at bind time.
    #[serde(default)]
    pub username_suffix: Option<String>,
    /// Attribute name overrides.
    #[serde(default)]
    pub attribute_map: AttributeMap,
}

fn default_search_filter() -> String {
    "(sAMAccountName={{username}})".to_string()
}

fn default_true() -> bool {
    true
}

impl std::fmt::Debug for CreateDirectoryConfigRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateDirectoryConfigRequest")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("bind_dn", &self.bind_dn)
            .field("bind_credentials", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl CreateDirectoryConfigRequest {
    /// Converts this request to a domain `DirectoryConfig`.
    #[must_use]
    pub fn into_config(self) -> DirectoryConfig {
        let mut config = DirectoryConfig::new(self.name, self.host, self.port);
        config.description = self.description;
        config.base_dn = self.base_dn;
        config.bind_dn = self.bind_dn;
        config.bind_credentials = self.bind_credentials;
        config.search_filter = self.search_filter;
        config.is_default = self.is_default;
        config.is_active = self.is_active;
        config.use_tls = self.use_tls;
        config.tls_cert_path = self.tls_cert_path;
        config.username_suffix = self.username_suffix;
        config.attribute_map = self.attribute_map;
        config
    }
}

/// Request to update a directory configuration. Absent fields keep
/// their current value; the bind credential is replaced only when a
/// non-empty value is sent.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDirectoryConfigRequest {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New host.
    #[serde(default)]
    pub host: Option<String>,
    /// New port.
    #[serde(default)]
    pub port: Option<u16>,
    /// New search base DN.
    #[serde(default)]
    pub base_dn: Option<String>,
    /// New service bind DN.
    #[serde(default)]
    pub bind_dn: Option<String>,
    /// New service bind credential.
    #[serde(default)]
    pub bind_credentials: Option<String>,
    /// New user search filter.
    #[serde(default)]
    pub search_filter: Option<String>,
    /// New default flag.
    #[serde(default)]
    pub is_default: Option<bool>,
    /// New active flag.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// New TLS flag.
    #[serde(default)]
    pub use_tls: Option<bool>,
    /// New trust-anchor certificate path.
    #[serde(default)]
    pub tls_cert_path: Option<String>,
    /// New username suffix.
    #[serde(default)]
    pub username_suffix: Option<String>,
    /// New attribute name overrides.
    #[serde(default)]
    pub attribute_map: Option<AttributeMap>,
}

impl std::fmt::Debug for UpdateDirectoryConfigRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateDirectoryConfigRequest")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("bind_dn", &self.bind_dn)
            .field(
                "bind_credentials",
                &self.bind_credentials.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl UpdateDirectoryConfigRequest {
    /// Applies this update to an existing configuration.
    pub fn apply_to(self, config: &mut DirectoryConfig) {
        if let Some(name) = self.name {
            config.name = name;
        }
        if let Some(description) = self.description {
            config.description = Some(description);
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(base_dn) = self.base_dn {
            config.base_dn = base_dn;
        }
        if let Some(bind_dn) = self.bind_dn {
            config.bind_dn = bind_dn;
        }
        if let Some(credentials) = self.bind_credentials {
            if !credentials.is_empty() {
                config.bind_credentials = credentials;
            }
        }
        if let Some(filter) = self.search_filter {
            config.search_filter = filter;
        }
        if let Some(is_default) = self.is_default {
            config.is_default = is_default;
        }
        if let Some(is_active) = self.is_active {
            config.is_active = is_active;
        }
        if let Some(use_tls) = self.use_tls {
            config.use_tls = use_tls;
        }
        if let Some(path) = self.tls_cert_path {
            config.tls_cert_path = Some(path);
        }
        if let Some(suffix) = self.username_suffix {
            config.username_suffix = Some(suffix);
        }
        if let Some(map) = self.attribute_map {
            config.attribute_map = map;
        }
        config.updated_at = Utc::now();
    }
}

/// Directory configuration as returned by the API. The bind credential
/// is omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryConfigResponse {
    /// Configuration id.
    pub id: Uuid,
    /// Configuration name.
    pub name: String,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Directory host.
    pub host: String,
    /// Directory port.
    pub port: u16,
    /// Search base DN.
    pub base_dn: String,
    /// Service bind DN.
    pub bind_dn: String,
    /// User search filter.
    pub search_filter: String,
    /// Whether this configuration is the default.
    pub is_default: bool,
    /// Whether this configuration is active.
    pub is_active: bool,
    /// Whether connections use TLS.
    pub use_tls: bool,
    /// Trust-anchor certificate path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_cert_path: Option<String>,
    /// Suffix appended to bare usernames.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username_suffix: Option<String>,
    /// Attribute name overrides.
    pub attribute_map: AttributeMap,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<DirectoryConfig> for DirectoryConfigResponse {
    fn from(config: DirectoryConfig) -> Self {
        Self {
            id: config.id,
            name: config.name,
            description: config.description,
            host: config.host,
            port: config.port,
            base_dn: config.base_dn,
            bind_dn: config.bind_dn,
            search_filter: config.search_filter,
            is_default: config.is_default,
            is_active: config.is_active,
            use_tls: config.use_tls,
            tls_cert_path: config.tls_cert_path,
            username_suffix: config.username_suffix,
            attribute_map: config.attribute_map,
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

/// Result of a configuration test.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfigResponse {
    /// Whether the configuration passed.
    pub success: bool,
    /// Outcome description.
    pub message: String,
}

// ============================================================================
// Role mappings
// ============================================================================

/// Request to create a group-to-role mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleMappingRequest {
    /// Directory configuration this mapping applies to; the nil UUID
    /// makes it apply to every configuration.
    pub directory_configuration_id: Uuid,
    /// Local role granted by this mapping.
    pub role_id: Uuid,
    /// Directory group DN to match.
    pub group_dn: String,
    /// Mapping kind (`group` or `ou`).
    #[serde(default)]
    pub mapping_type: Option<String>,
}

impl CreateRoleMappingRequest {
    /// Converts this request to a domain mapping. The group name is
    /// derived from the `CN=` component of the DN.
    #[must_use]
    pub fn into_mapping(self) -> DirectoryRoleMapping {
        let mut mapping =
            DirectoryRoleMapping::new(self.directory_configuration_id, self.role_id, self.group_dn);
        if let Some(kind) = self.mapping_type.as_deref().and_then(MappingType::parse) {
            mapping.mapping_type = kind;
        }
        mapping
    }
}

/// Group-to-role mapping as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMappingResponse {
    /// Mapping id.
    pub id: Uuid,
    /// Directory configuration id (nil UUID means all configurations).
    pub directory_configuration_id: Uuid,
    /// Granted role id.
    pub role_id: Uuid,
    /// Matched group DN.
    pub group_dn: String,
    /// Group name derived from the DN.
    pub group_name: String,
    /// Mapping kind.
    pub mapping_type: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<DirectoryRoleMapping> for RoleMappingResponse {
    fn from(mapping: DirectoryRoleMapping) -> Self {
        Self {
            id: mapping.id,
            directory_configuration_id: mapping.directory_config_id,
            role_id: mapping.role_id,
            group_dn: mapping.group_dn,
            group_name: mapping.group_name,
            mapping_type: mapping.mapping_type.as_str().to_string(),
            created_at: mapping.created_at,
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// User as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User id.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Email address, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Whether the user may log in.
    pub is_active: bool,
    /// Last successful login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    /// Source directory configuration, for directory-backed users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_configuration_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            directory_configuration_id: user.directory_config_id,
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Synchronization
// ============================================================================

/// Request to run a bulk synchronization pass.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// Configuration to synchronize; the default one when absent.
    #[serde(default)]
    pub directory_configuration_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_accepts_camel_case() {
        let json = r#"{
            "username": "jdoe",
            "password": "s3cret",
            "directoryConfigurationId": "00000000-0000-0000-0000-000000000000"
        }"#;
        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.username, "jdoe");
        assert_eq!(request.directory_configuration_id, Some(Uuid::nil()));
    }

    #[test]
    fn login_request_debug_hides_password() {
        let request = LoginRequest {
            username: "jdoe".to_string(),
            password: "s3cret".to_string(),
            directory_configuration_id: None,
        };
        let debug = format!("{request:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn config_response_omits_bind_credentials() {
        let mut config = DirectoryConfig::new("corp", "ldap.corp.example.com", 636);
        config.bind_credentials = "hunter2".to_string();
        let response = DirectoryConfigResponse::from(config);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("bindCredentials"));
    }

    #[test]
    fn update_keeps_credential_when_empty() {
        let mut config = DirectoryConfig::new("corp", "ldap.corp.example.com", 389);
        config.bind_credentials = "hunter2".to_string();
        let update = UpdateDirectoryConfigRequest {
            bind_credentials: Some(String::new()),
            host: Some("ldap2.corp.example.com".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut config);
        assert_eq!(config.bind_credentials, "hunter2");
        assert_eq!(config.host, "ldap2.corp.example.com");
    }

    #[test]
    fn mapping_request_derives_group_name() {
        let request = CreateRoleMappingRequest {
            directory_configuration_id: Uuid::nil(),
            role_id: Uuid::now_v7(),
            group_dn: "CN=Portal Admins,OU=Groups,DC=corp".to_string(),
            mapping_type: None,
        };
        let mapping = request.into_mapping();
        assert_eq!(mapping.group_name, "Portal Admins");
        assert_eq!(mapping.mapping_type, MappingType::Group);
    }
}
