//! Application state management.
//!
//! This module defines the shared state that is passed to all request handlers.

use std::sync::Arc;

use sp_auth::{DirectoryAuthFlow, DirectorySynchronizer, InMemoryRoleCache, TokenIssuer};

use crate::config::ServerConfig;
use crate::providers::StorageProviders;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,

    /// Storage providers.
    pub providers: StorageProviders,

    /// Login and token flows.
    pub auth: Arc<DirectoryAuthFlow>,

    /// Bulk directory synchronization.
    pub synchronizer: Arc<DirectorySynchronizer>,
}

impl AppState {
    /// Wires the authentication flows over the given providers.
    #[must_use]
    pub fn new(config: ServerConfig, providers: StorageProviders) -> Self {
        let issuer = TokenIssuer::new(config.tokens.clone());
        let cache = Arc::new(InMemoryRoleCache::new());

        let mut flow = DirectoryAuthFlow::new(
            providers.configs.clone(),
            providers.reconciler.clone(),
            issuer,
            cache.clone(),
        );
        if let Some(admin) = config.admin.clone() {
            flow = flow.with_admin(admin);
        }

        let synchronizer = Arc::new(DirectorySynchronizer::new(
            providers.configs.clone(),
            providers.reconciler.clone(),
            cache,
        ));

        Self {
            config,
            providers,
            auth: Arc::new(flow),
            synchronizer,
        }
    }
}
