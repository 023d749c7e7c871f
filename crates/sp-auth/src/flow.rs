//! Login flows.
//!
//! The directory flow wires configuration resolution, the protocol
//! client, attribute mapping, transactional reconciliation, and token
//! issuance into one pipeline. The admin flow validates the fixed,
//! environment-configured admin credential locally.

use std::sync::Arc;

use sp_directory::{ConnectionParams, DirectoryClient, map_entry, resolve_configuration};
use sp_model::User;
use sp_storage::{DirectoryConfigProvider, DirectoryReconciler};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::RoleCache;
use crate::error::{AuthError, AuthResult};
use crate::token::{TokenIssuer, TokenPair};
use crate::{password, validation};

/// The environment-configured local admin credential.
#[derive(Clone)]
pub struct AdminCredentials {
    /// Admin login name.
    pub username: String,
    /// PHC-formatted Argon2id hash of the admin password.
    pub password_hash: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Outcome of a successful login.
#[derive(Debug)]
pub struct AuthSuccess {
    /// The authenticated user.
    pub user: User,
    /// Effective role names.
    pub roles: Vec<String>,
    /// Issued token pair.
    pub tokens: TokenPair,
}

/// Authentication flows over a directory and the local admin credential.
pub struct DirectoryAuthFlow {
    configs: Arc<dyn DirectoryConfigProvider>,
    reconciler: Arc<dyn DirectoryReconciler>,
    issuer: TokenIssuer,
    cache: Arc<dyn RoleCache>,
    admin: Option<AdminCredentials>,
}

impl DirectoryAuthFlow {
    /// Creates a flow over the given collaborators.
    #[must_use]
    pub fn new(
        configs: Arc<dyn DirectoryConfigProvider>,
        reconciler: Arc<dyn DirectoryReconciler>,
        issuer: TokenIssuer,
        cache: Arc<dyn RoleCache>,
    ) -> Self {
        Self {
            configs,
            reconciler,
            issuer,
            cache,
            admin: None,
        }
    }

    /// Enables the local admin login with the given credential.
    #[must_use]
    pub fn with_admin(mut self, admin: AdminCredentials) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Authenticates a user against a directory and reconciles the
    /// result into local storage.
    ///
    /// # Errors
    ///
    /// All directory failures collapse to `InvalidCredentials` and all
    /// reconciliation failures to `RegistrationFailed`; the internal
    /// cause is logged, never returned.
    pub async fn login_directory(
        &self,
        username: &str,
        password: &str,
        config_id: Option<Uuid>,
    ) -> AuthResult<AuthSuccess> {
        validation::screen_username(username)?;

        let config = resolve_configuration(self.configs.as_ref(), config_id)
            .await
            .map_err(|e| {
                warn!(username, error = %e, "directory configuration resolution failed");
                AuthError::InvalidCredentials
            })?;
        let config_id = config.id;
        let attribute_map = config.attribute_map.clone();

        let params = ConnectionParams::from_config(config).map_err(|e| {
            warn!(username, error = %e, "connection parameter construction failed");
            AuthError::InvalidCredentials
        })?;

        let client = DirectoryClient::new(params);
        let entry = client.authenticate(username, password).await.map_err(|e| {
            // Wrong password and unreachable server are indistinguishable here
            warn!(username, error = %e, "directory authentication failed");
            AuthError::InvalidCredentials
        })?;

        let directory_user = map_entry(&entry, &attribute_map);

        let outcome = self
            .reconciler
            .reconcile(&directory_user, config_id)
            .await
            .map_err(|e| {
                warn!(username, error = %e, "user reconciliation failed");
                AuthError::RegistrationFailed
            })?;

        let roles: Vec<String> = outcome.roles.iter().map(|r| r.name.clone()).collect();
        self.cache.put(outcome.user.id, roles.clone());

        let tokens = self.issuer.issue(&outcome.user, &roles)?;

        info!(
            username = %outcome.user.username,
            created = outcome.created,
            role_count = roles.len(),
            "directory login succeeded"
        );

        Ok(AuthSuccess {
            user: outcome.user,
            roles,
            tokens,
        })
    }

    /// Validates the local admin credential.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` when no admin is configured, the
    /// username doesn't match, or the password fails verification.
    pub fn login_admin(&self, username: &str, password: &str) -> AuthResult<AuthSuccess> {
        validation::screen_username(username)?;

        let admin = self.admin.as_ref().ok_or(AuthError::InvalidCredentials)?;
        if username != admin.username {
            return Err(AuthError::InvalidCredentials);
        }

        password::verify(password, &admin.password_hash).map_err(|_| {
            warn!(username, "admin password verification failed");
            AuthError::InvalidCredentials
        })?;

        // The admin is a fixed identity, not a stored user
        let mut user = User::new(&admin.username);
        user.id = Uuid::nil();
        let roles = vec!["admin".to_string()];

        let tokens = self.issuer.issue(&user, &roles)?;

        info!(username, "admin login succeeded");

        Ok(AuthSuccess {
            user,
            roles,
            tokens,
        })
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRefreshToken` on any verification failure.
    pub fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        self.issuer.refresh(refresh_token)
    }

    /// Verifies an access token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` on any verification failure.
    pub fn verify_access(&self, token: &str) -> AuthResult<crate::token::Claims> {
        self.issuer.verify_access(token)
    }

    /// Returns the cached role names for a user, freshest known from
    /// the last login or sync. `None` when no entry is cached.
    #[must_use]
    pub fn cached_roles(&self, user_id: Uuid) -> Option<Vec<String>> {
        self.cache.get(user_id)
    }

    /// Returns the role cache shared with this flow.
    #[must_use]
    pub fn role_cache(&self) -> Arc<dyn RoleCache> {
        self.cache.clone()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use sp_model::{DirectoryConfig, DirectoryUser, Role};
    use sp_storage::error::StorageResult;
    use sp_storage::ReconcileOutcome;

    use super::*;
    use crate::cache::InMemoryRoleCache;
    use crate::token::TokenConfig;

    struct NoConfigs;

    #[async_trait]
    impl DirectoryConfigProvider for NoConfigs {
        async fn create(&self, _config: &DirectoryConfig) -> StorageResult<()> {
            Ok(())
        }
        async fn update(&self, _config: &DirectoryConfig) -> StorageResult<()> {
            Ok(())
        }
        async fn delete(&self, _id: Uuid) -> StorageResult<()> {
            Ok(())
        }
        async fn get_by_id(&self, _id: Uuid) -> StorageResult<Option<DirectoryConfig>> {
            Ok(None)
        }
        async fn get_default(&self) -> StorageResult<Option<DirectoryConfig>> {
            Ok(None)
        }
        async fn list(&self) -> StorageResult<Vec<DirectoryConfig>> {
            Ok(vec![])
        }
    }

    struct NoopReconciler;

    #[async_trait]
    impl DirectoryReconciler for NoopReconciler {
        async fn reconcile(
            &self,
            directory_user: &DirectoryUser,
            config_id: Uuid,
        ) -> StorageResult<ReconcileOutcome> {
            let user = User::new(&directory_user.username).with_directory_config(config_id);
            Ok(ReconcileOutcome {
                user,
                roles: vec![Role::new("user")],
                created: true,
            })
        }
    }

    fn flow() -> DirectoryAuthFlow {
        let issuer = TokenIssuer::new(TokenConfig {
            access_secret: "a".to_string(),
            refresh_secret: "r".to_string(),
            access_expiration: "1h".to_string(),
            refresh_expiration: "7d".to_string(),
            rotate_refresh: false,
        });
        DirectoryAuthFlow::new(
            Arc::new(NoConfigs),
            Arc::new(NoopReconciler),
            issuer,
            Arc::new(InMemoryRoleCache::new()),
        )
    }

    #[tokio::test]
    async fn directory_login_without_config_is_unauthorized() {
        let err = flow()
            .login_directory("jdoe", "secret", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn suspicious_username_rejected_before_directory_traffic() {
        let err = flow()
            .login_directory("jdoe'--", "secret", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput));
    }

    #[test]
    fn admin_login_round_trip() {
        let hash = password::hash("hunter2").unwrap();
        let flow = flow().with_admin(AdminCredentials {
            username: "admin".to_string(),
            password_hash: hash,
        });

        let success = flow.login_admin("admin", "hunter2").unwrap();
        assert_eq!(success.roles, vec!["admin"]);
        assert_eq!(success.user.id, Uuid::nil());

        assert!(matches!(
            flow.login_admin("admin", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            flow.login_admin("someone", "hunter2"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn cached_roles_reflect_cache_contents() {
        let flow = flow();
        let user_id = Uuid::now_v7();

        assert!(flow.cached_roles(user_id).is_none());

        flow.role_cache()
            .put(user_id, vec!["user".to_string(), "auditor".to_string()]);
        assert_eq!(
            flow.cached_roles(user_id),
            Some(vec!["user".to_string(), "auditor".to_string()])
        );
    }

    #[test]
    fn admin_login_disabled_when_unconfigured() {
        assert!(matches!(
            flow().login_admin("admin", "hunter2"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
