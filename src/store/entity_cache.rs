//! # Entity Cache Store
//!
//! Process-wide cache for a collection that is fetched once and reused.
//!
//! ## Not loaded vs. empty
//!
//! [`EntityCacheStore::get`] returns `None` before the first [`set`](EntityCacheStore::set)
//! and `Some(vec![])` when the server returned an empty list. That difference
//! is load state, not data: branch on it before branching on emptiness.
//!
//! ## Permanent cache
//!
//! Nothing here ever expires or refetches on its own. A caller that wants
//! fresh data calls [`invalidate`](EntityCacheStore::invalidate) and reloads.

use super::persistence::{load_snapshot, save_snapshot, SnapshotStorage};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key for the forum directory snapshot.
pub const FORUM_STORAGE_KEY: &str = "forum-storage";

/// Anything that can live in an [`EntityCacheStore`] and be looked up by id.
pub trait CacheEntity: Clone + Send + Sync + 'static {
    type Id: PartialEq + Copy + Send + Sync + Display + Debug;

    fn id(&self) -> Self::Id;
}

/// Cached collection, `None` until loaded.
pub type EntityCache<T> = Option<Vec<T>>;

struct Persistence {
    storage: Arc<dyn SnapshotStorage>,
    key: &'static str,
}

/// Shared cache for one collection. Optionally persisted under a fixed key.
pub struct EntityCacheStore<T: CacheEntity> {
    items: RwLock<EntityCache<T>>,
    persistence: Option<Persistence>,
}

impl<T: CacheEntity> Default for EntityCacheStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CacheEntity> EntityCacheStore<T> {
    /// An in-memory cache, not yet loaded.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(None),
            persistence: None,
        }
    }

    /// Snapshot of the current cache.
    pub fn get(&self) -> EntityCache<T> {
        self.items.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.items.read().is_some()
    }

    /// Synchronous scan of the current snapshot. Never does I/O.
    pub fn lookup_by_id(&self, id: T::Id) -> Option<T> {
        self.items
            .read()
            .as_ref()
            .and_then(|items| items.iter().find(|item| item.id() == id).cloned())
    }

    fn persist(&self, items: &EntityCache<T>)
    where
        T: Serialize,
    {
        let Some(persistence) = &self.persistence else {
            return;
        };
        let result = match items {
            Some(items) => save_snapshot(persistence.storage.as_ref(), persistence.key, items),
            None => persistence.storage.remove(persistence.key),
        };
        if let Err(e) = result {
            warn!(key = persistence.key, error = %e, "Failed to persist cache");
        }
    }
}

impl<T: CacheEntity + Serialize + DeserializeOwned> EntityCacheStore<T> {
    /// A cache persisted under `key`, restored from `storage` now.
    ///
    /// An unreadable snapshot restores as not loaded.
    pub fn persisted(storage: Arc<dyn SnapshotStorage>, key: &'static str) -> Self {
        let items = match load_snapshot::<Vec<T>>(storage.as_ref(), key) {
            Ok(items) => items,
            Err(e) => {
                warn!(key, error = %e, "Cache snapshot unreadable, starting unloaded");
                None
            }
        };
        debug!(key, loaded = items.is_some(), "Cache restored");
        Self {
            items: RwLock::new(items),
            persistence: Some(Persistence { storage, key }),
        }
    }

    /// Replaces the whole collection.
    pub fn set(&self, items: Vec<T>) {
        let mut current = self.items.write();
        info!(size = items.len(), "Cache set");
        *current = Some(items);
        self.persist(&current);
    }

    /// Back to not loaded.
    pub fn invalidate(&self) {
        let mut current = self.items.write();
        info!("Cache invalidated");
        *current = None;
        self.persist(&current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Forum;
    use crate::store::MemoryStorage;

    fn forums() -> Vec<Forum> {
        vec![
            Forum::new(1, "General", "Anything goes").with_members([1, 2]),
            Forum::new(2, "Rust", "Borrow checker support group").with_members([2]),
        ]
    }

    #[test]
    fn test_unloaded_and_missing_both_lookup_none() {
        let cache = EntityCacheStore::<Forum>::new();
        assert_eq!(cache.get(), None);
        assert_eq!(cache.lookup_by_id(1), None);

        cache.set(Vec::new());
        assert_eq!(cache.get(), Some(Vec::new()));
        assert_eq!(cache.lookup_by_id(1), None);

        cache.set(forums());
        let rust = cache.lookup_by_id(2).map(|f| f.title);
        assert_eq!(rust.as_deref(), Some("Rust"));
        assert_eq!(cache.lookup_by_id(99), None);
    }

    #[test]
    fn test_set_replaces_wholesale_and_invalidate_unloads() {
        let cache = EntityCacheStore::<Forum>::new();
        cache.set(forums());
        cache.set(vec![Forum::new(3, "Off-topic", "")]);
        assert_eq!(cache.lookup_by_id(1), None);
        assert!(cache.lookup_by_id(3).is_some());

        cache.invalidate();
        assert!(!cache.is_loaded());
    }

    #[test]
    fn test_persisted_cache_restores() {
        let storage: Arc<dyn SnapshotStorage> = Arc::new(MemoryStorage::new());
        let cache = EntityCacheStore::<Forum>::persisted(storage.clone(), FORUM_STORAGE_KEY);
        assert!(!cache.is_loaded());
        cache.set(forums());

        let restored = EntityCacheStore::<Forum>::persisted(storage.clone(), FORUM_STORAGE_KEY);
        assert_eq!(restored.get(), Some(forums()));

        restored.invalidate();
        let unloaded = EntityCacheStore::<Forum>::persisted(storage, FORUM_STORAGE_KEY);
        assert_eq!(unloaded.get(), None);
    }

    #[test]
    fn test_persisted_empty_is_still_loaded() {
        let storage: Arc<dyn SnapshotStorage> = Arc::new(MemoryStorage::new());
        EntityCacheStore::<Forum>::persisted(storage.clone(), FORUM_STORAGE_KEY).set(Vec::new());
        let restored = EntityCacheStore::<Forum>::persisted(storage, FORUM_STORAGE_KEY);
        assert_eq!(restored.get(), Some(Vec::new()));
    }
}
