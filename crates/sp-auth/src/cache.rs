//! Role cache.
//!
//! An injectable cache of effective role names per user, invalidated
//! explicitly whenever role assignments change (by the login flow after
//! reconciliation and by admin role writes).

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

/// Cache of effective role names keyed by user id.
pub trait RoleCache: Send + Sync {
    /// Gets the cached role names for a user.
    fn get(&self, user_id: Uuid) -> Option<Vec<String>>;

    /// Stores the role names for a user.
    fn put(&self, user_id: Uuid, roles: Vec<String>);

    /// Drops the entry for a user.
    fn invalidate(&self, user_id: Uuid);

    /// Drops every entry.
    fn clear(&self);
}

/// In-process role cache.
#[derive(Default)]
pub struct InMemoryRoleCache {
    entries: RwLock<HashMap<Uuid, Vec<String>>>,
}

impl InMemoryRoleCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoleCache for InMemoryRoleCache {
    fn get(&self, user_id: Uuid) -> Option<Vec<String>> {
        self.entries.read().get(&user_id).cloned()
    }

    fn put(&self, user_id: Uuid, roles: Vec<String>) {
        self.entries.write().insert(user_id, roles);
    }

    fn invalidate(&self, user_id: Uuid) {
        self.entries.write().remove(&user_id);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_invalidate() {
        let cache = InMemoryRoleCache::new();
        let user_id = Uuid::now_v7();

        assert!(cache.get(user_id).is_none());

        cache.put(user_id, vec!["user".to_string()]);
        assert_eq!(cache.get(user_id), Some(vec!["user".to_string()]));

        cache.invalidate(user_id);
        assert!(cache.get(user_id).is_none());
    }

    #[test]
    fn clear_drops_everything() {
        let cache = InMemoryRoleCache::new();
        cache.put(Uuid::now_v7(), vec!["a".to_string()]);
        cache.put(Uuid::now_v7(), vec!["b".to_string()]);

        cache.clear();
        assert!(cache.entries.read().is_empty());
    }
}
