//! Connection parameter construction and configuration resolution.
//!
//! Turns a stored [`DirectoryConfig`] into the concrete values the
//! protocol client needs: the connection URL, an optional TLS trust
//! anchor, and the bind identity with any configured suffix applied.

use sp_model::DirectoryConfig;
use sp_storage::DirectoryConfigProvider;
use uuid::Uuid;

use crate::error::{DirectoryError, DirectoryResult};

/// Concrete connection parameters for one directory server.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// Configuration these parameters were built from.
    pub config: DirectoryConfig,
    /// Connection URL (`ldap://` or `ldaps://`).
    pub url: String,
    /// PEM trust-anchor certificate, loaded when TLS is on and a
    /// certificate path is configured.
    pub tls_cert: Option<Vec<u8>>,
    /// Bind identity with the username suffix applied.
    pub bind_identity: String,
}

impl ConnectionParams {
    /// Builds connection parameters from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Configuration` if the configuration is
    /// incomplete, or `DirectoryError::Tls` if the trust-anchor
    /// certificate cannot be read.
    pub fn from_config(config: DirectoryConfig) -> DirectoryResult<Self> {
        if !config.is_complete() {
            return Err(DirectoryError::config(format!(
                "configuration '{}' is missing connection fields",
                config.name
            )));
        }

        let scheme = if config.use_tls { "ldaps" } else { "ldap" };
        let url = format!("{scheme}://{}:{}", config.host, config.port);

        // A configured cert that cannot be read is fatal, not retried
        let tls_cert = match (config.use_tls, &config.tls_cert_path) {
            (true, Some(path)) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    DirectoryError::Tls(format!("cannot read certificate '{path}': {e}"))
                })?;
                Some(bytes)
            }
            _ => None,
        };

        let bind_identity = apply_suffix(&config.bind_dn, config.username_suffix.as_deref());

        Ok(Self {
            config,
            url,
            tls_cert,
            bind_identity,
        })
    }

    /// Applies the configured suffix to a login name for user binds.
    #[must_use]
    pub fn login_identity(&self, username: &str) -> String {
        apply_suffix(username, self.config.username_suffix.as_deref())
    }
}

/// Appends the suffix unless the identity already carries it.
fn apply_suffix(identity: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) if !suffix.is_empty() && !identity.ends_with(suffix) => {
            format!("{identity}{suffix}")
        }
        _ => identity.to_string(),
    }
}

/// Resolves which directory configuration applies to a login attempt.
///
/// With an explicit id the configuration is fetched directly; otherwise
/// the one flagged default is used.
///
/// # Errors
///
/// Returns `NoConfiguration` if nothing resolves, or `Inactive` if the
/// resolved configuration is disabled.
pub async fn resolve_configuration(
    provider: &dyn DirectoryConfigProvider,
    config_id: Option<Uuid>,
) -> DirectoryResult<DirectoryConfig> {
    let config = match config_id {
        Some(id) => provider.get_by_id(id).await?,
        None => provider.get_default().await?,
    };

    let Some(config) = config else {
        let what = config_id.map_or_else(
            || "no default configuration is set".to_string(),
            |id| format!("configuration {id} does not exist"),
        );
        return Err(DirectoryError::NoConfiguration(what));
    };

    if !config.is_active {
        return Err(DirectoryError::Inactive(config.name));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> DirectoryConfig {
        DirectoryConfig::new("corp", "ldap.example.com", 389)
            .with_base_dn("dc=example,dc=com")
            .with_bind("cn=svc,dc=example,dc=com", "secret")
    }

    #[test]
    fn plain_scheme_without_tls() {
        let params = ConnectionParams::from_config(complete_config()).unwrap();
        assert_eq!(params.url, "ldap://ldap.example.com:389");
        assert!(params.tls_cert.is_none());
    }

    #[test]
    fn secure_scheme_with_tls() {
        let mut config = complete_config();
        config.use_tls = true;
        config.port = 636;

        let params = ConnectionParams::from_config(config).unwrap();
        assert_eq!(params.url, "ldaps://ldap.example.com:636");
    }

    #[test]
    fn missing_cert_file_is_fatal() {
        let mut config = complete_config();
        config.use_tls = true;
        config.tls_cert_path = Some("/nonexistent/ca.pem".to_string());

        let err = ConnectionParams::from_config(config).unwrap_err();
        assert!(matches!(err, DirectoryError::Tls(_)));
    }

    #[test]
    fn incomplete_config_rejected() {
        let config = DirectoryConfig::new("corp", "ldap.example.com", 389);
        let err = ConnectionParams::from_config(config).unwrap_err();
        assert!(matches!(err, DirectoryError::Configuration(_)));
    }

    #[test]
    fn suffix_applied_to_bind_and_login() {
        let config = complete_config().with_username_suffix("@example.com");
        let params = ConnectionParams::from_config(config).unwrap();

        assert_eq!(
            params.bind_identity,
            "cn=svc,dc=example,dc=com@example.com"
        );
        assert_eq!(params.login_identity("jdoe"), "jdoe@example.com");
        // Already-suffixed identities are left alone
        assert_eq!(params.login_identity("jdoe@example.com"), "jdoe@example.com");
    }
}
