//! Directory protocol client.
//!
//! Each operation opens a fresh connection, binds with the service
//! account, and unbinds when done. Password validation binds as the
//! user and always discards the connection afterwards since it is no
//! longer bound as the service account.

use std::time::Duration;

use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use native_tls::{Certificate, TlsConnector};
use tracing::{debug, warn};

use crate::error::{DirectoryError, DirectoryResult};
use crate::params::ConnectionParams;
use crate::search::{DirectoryEntry, build_user_filter};

/// Connect timeout applied to every directory connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for one configured directory server.
pub struct DirectoryClient {
    params: ConnectionParams,
}

impl DirectoryClient {
    /// Creates a client from resolved connection parameters.
    #[must_use]
    pub const fn new(params: ConnectionParams) -> Self {
        Self { params }
    }

    /// Returns the connection parameters.
    #[must_use]
    pub const fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Opens a connection and binds with the service account.
    async fn connect_and_bind(&self) -> DirectoryResult<Ldap> {
        let mut ldap = self.connect().await?;

        ldap.simple_bind(
            &self.params.bind_identity,
            &self.params.config.bind_credentials,
        )
        .await
        .map_err(|e| DirectoryError::Bind(e.to_string()))?
        .success()
        .map_err(|e| DirectoryError::Bind(format!("service bind failed: {e:?}")))?;

        Ok(ldap)
    }

    /// Opens an unbound connection.
    async fn connect(&self) -> DirectoryResult<Ldap> {
        let mut settings = LdapConnSettings::new().set_conn_timeout(CONNECT_TIMEOUT);

        if let Some(pem) = &self.params.tls_cert {
            let cert = Certificate::from_pem(pem)
                .map_err(|e| DirectoryError::Tls(format!("invalid trust anchor: {e}")))?;
            let connector = TlsConnector::builder()
                .add_root_certificate(cert)
                .build()
                .map_err(|e| DirectoryError::Tls(e.to_string()))?;
            settings = settings.set_connector(connector);
        }

        let (conn, ldap) = LdapConnAsync::with_settings(settings, &self.params.url)
            .await
            .map_err(|e| DirectoryError::connection(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "directory connection driver error");
            }
        });

        Ok(ldap)
    }

    /// Finds a user entry by login name.
    pub async fn find_user(&self, username: &str) -> DirectoryResult<Option<DirectoryEntry>> {
        let mut ldap = self.connect_and_bind().await?;
        let result = self.search_user(&mut ldap, username).await;
        let _ = ldap.unbind().await;
        result
    }

    async fn search_user(
        &self,
        ldap: &mut Ldap,
        username: &str,
    ) -> DirectoryResult<Option<DirectoryEntry>> {
        let config = &self.params.config;
        let filter = build_user_filter(&config.search_filter, username);
        let attrs = vec![
            "dn",
            config.attribute_map.username.as_str(),
            config.attribute_map.display_name.as_str(),
            config.attribute_map.email.as_str(),
            config.attribute_map.user_id.as_str(),
            "cn",
            "memberOf",
        ];

        debug!(base_dn = %config.base_dn, %filter, "searching directory for user");

        let (rs, _result) = ldap
            .search(&config.base_dn, Scope::Subtree, &filter, attrs)
            .await
            .map_err(|e| DirectoryError::Search(e.to_string()))?
            .success()
            .map_err(|e| DirectoryError::Search(format!("search failed: {e:?}")))?;

        Ok(rs
            .into_iter()
            .next()
            .map(SearchEntry::construct)
            .map(DirectoryEntry::from_search_entry))
    }

    /// Lists every entry matching the user filter with a wildcard login
    /// name. Used by bulk synchronization.
    pub async fn list_users(&self) -> DirectoryResult<Vec<DirectoryEntry>> {
        let config = &self.params.config;
        // Deliberately unescaped: the wildcard is the point here
        let filter = config.search_filter.replace("{{username}}", "*");
        let attrs = vec![
            "dn",
            config.attribute_map.username.as_str(),
            config.attribute_map.display_name.as_str(),
            config.attribute_map.email.as_str(),
            config.attribute_map.user_id.as_str(),
            "cn",
            "memberOf",
        ];

        let mut ldap = self.connect_and_bind().await?;
        let result = ldap
            .search(&config.base_dn, Scope::Subtree, &filter, attrs)
            .await
            .map_err(|e| DirectoryError::Search(e.to_string()));
        let _ = ldap.unbind().await;

        let (rs, _result) = result?
            .success()
            .map_err(|e| DirectoryError::Search(format!("search failed: {e:?}")))?;

        Ok(rs
            .into_iter()
            .map(SearchEntry::construct)
            .map(DirectoryEntry::from_search_entry)
            .collect())
    }

    /// Validates a password by binding as the user.
    ///
    /// Returns `false` on invalid credentials (result code 49) and an
    /// error for any other failure. The connection is always discarded
    /// because it is no longer bound as the service account.
    ///
    /// ## Security
    ///
    /// The password is never logged or stored.
    pub async fn verify_password(&self, user_dn: &str, password: &str) -> DirectoryResult<bool> {
        // Empty passwords would be an anonymous bind, which succeeds
        if password.is_empty() {
            return Ok(false);
        }

        let mut ldap = self.connect().await?;

        let bind = ldap
            .simple_bind(user_dn, password)
            .await
            .map_err(|e| DirectoryError::Bind(e.to_string()));

        let verified = match bind {
            Ok(result) => match result.success() {
                Ok(_) => Ok(true),
                Err(e) => {
                    let err_str = format!("{e:?}");
                    if err_str.contains("49") || err_str.contains("InvalidCredentials") {
                        Ok(false)
                    } else {
                        Err(DirectoryError::Bind(format!("bind error: {e:?}")))
                    }
                }
            },
            Err(e) => Err(e),
        };

        let _ = ldap.unbind().await;
        verified
    }

    /// Authenticates a user: locates the entry, then validates the
    /// password with a user bind.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` when no entry matches and `Bind` when the
    /// password is wrong.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> DirectoryResult<DirectoryEntry> {
        let entry = self
            .find_user(username)
            .await?
            .ok_or_else(|| DirectoryError::user_not_found(username))?;

        if self.verify_password(&entry.dn, password).await? {
            Ok(entry)
        } else {
            Err(DirectoryError::Bind("invalid credentials".to_string()))
        }
    }

    /// Tests connectivity: connects, binds with the service account,
    /// and performs a base-scope search against the base DN.
    pub async fn test_connection(&self) -> DirectoryResult<()> {
        let mut ldap = self.connect_and_bind().await?;

        let result = ldap
            .search(
                &self.params.config.base_dn,
                Scope::Base,
                "(objectClass=*)",
                vec!["dn"],
            )
            .await
            .map_err(|e| DirectoryError::connection(format!("test search failed: {e}")));

        let _ = ldap.unbind().await;
        result.map(|_| ())
    }
}
