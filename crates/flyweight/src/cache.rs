use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, RwLock};
use tracing::{debug, trace};

/// A registry guaranteeing at most one live instance per distinct key.
///
/// Keys must be derived purely from intrinsic attributes: two logically equal
/// intrinsic states must produce equal keys. The cache grows monotonically:
/// entries are never evicted or replaced, and individual entries live as long
/// as the cache itself (plus any `Arc` handles still held by callers).
///
/// The cache can be shared across threads. Hits are served under a shared
/// read lock, so concurrent readers never block each other; the miss path
/// takes the write lock and re-checks before constructing, so the factory
/// runs at most once per key even when several callers race on it.
pub struct FlyweightCache<K, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
}

impl<K, V> FlyweightCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self { entries: RwLock::new(HashMap::new()) }
    }

    /// Returns the instance registered under `key`, constructing it on first
    /// request.
    ///
    /// On a hit the existing instance is returned unchanged and `factory` is
    /// dropped without being invoked. On a miss `factory` is invoked exactly
    /// once and its result registered under `key`.
    pub fn get_or_create<F>(&self, key: K, factory: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        {
            let entries = self.entries.read().expect("flyweight registry lock poisoned");
            if let Some(existing) = entries.get(&key) {
                trace!(distinct = entries.len(), "flyweight hit");
                return Arc::clone(existing);
            }
        }

        let mut entries = self.entries.write().expect("flyweight registry lock poisoned");
        // another caller may have constructed between the two locks
        if let Some(existing) = entries.get(&key) {
            return Arc::clone(existing);
        }

        let value = Arc::new(factory());
        entries.insert(key, Arc::clone(&value));
        debug!(distinct = entries.len(), "flyweight constructed");
        value
    }

    /// Looks up `key` without constructing anything on a miss.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.read().expect("flyweight registry lock poisoned").get(key).map(Arc::clone)
    }

    /// Number of distinct keys currently registered.
    pub fn size(&self) -> usize {
        self.entries.read().expect("flyweight registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<K, V> Default for FlyweightCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for FlyweightCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.entries.read().map(|entries| entries.len()).unwrap_or(0);
        f.debug_struct("FlyweightCache").field("size", &size).finish()
    }
}
