//! Cache Janitor
//!
//! Bulk deletion of persisted local entries tied to a user identity.
//! Two policies: purge everything (explicit sign-out, confirmed expiry)
//! or purge only identity-linked entries (auth trouble observed but
//! expiry not yet confirmed; reference caches are kept to avoid refetch
//! churn).
//!
//! No network calls happen here. On hosts without persistent storage
//! every purge returns immediately, and deleting an absent key is a
//! no-op, so purging is idempotent.

use std::sync::Arc;

use platform::storage::StorageBackend;

use crate::domain::cache_key::CacheKey;

/// Deletes persisted cache entries in bulk
#[derive(Clone)]
pub struct CacheJanitor {
    storage: Arc<dyn StorageBackend>,
}

impl CacheJanitor {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Remove every registered key, auth-core and derived alike
    pub fn purge_all(&self) {
        if !self.storage.is_available() {
            return;
        }
        for key in CacheKey::ALL {
            self.storage.remove(key.name());
        }
        tracing::debug!(keys = CacheKey::ALL.len(), "Purged all cached entries");
    }

    /// Remove only identity-linked keys
    pub fn purge_user_specific(&self) {
        if !self.storage.is_available() {
            return;
        }
        let mut purged = 0;
        for key in CacheKey::ALL.iter().filter(|k| k.identity_linked()) {
            self.storage.remove(key.name());
            purged += 1;
        }
        tracing::debug!(keys = purged, "Purged identity-linked cached entries");
    }
}
