//! Bounded LRU caches in front of hot tables.
//!
//! Two variants with different aliasing semantics, chosen per table:
//!
//! - [`ValueCache`] stores values and hands out independent clones.
//!   A caller mutating its copy can never affect what other callers
//!   read. Receipts require this.
//! - [`HandleCache`] stores `Arc` handles and hands out shared clones
//!   of the same allocation. Transaction positions use this.
//!
//! Absence in a cache is never authoritative — callers fall through to
//! the backing table. Both variants are internally synchronized; a
//! single instance needs no external locking.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

/// By-value LRU cache: `get` returns an independent clone.
pub struct ValueCache<K: Hash + Eq, V: Clone> {
    entries: Mutex<LruCache<K, V>>,
}

impl<K: Hash + Eq, V: Clone> ValueCache<K, V> {
    /// Create a cache holding at most `capacity` entries, or `None` if
    /// `capacity` is 0 (caching disabled).
    pub fn new(capacity: usize) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self {
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Look up `key`, promoting it to most-recently-used on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        entries.get(key).cloned()
    }

    /// Insert `value` under `key`, evicting the least-recently-used
    /// entry if the cache is full.
    pub fn put(&self, key: K, value: V) {
        let mut entries = self.entries.lock();
        entries.put(key, value);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock();
        entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// By-handle LRU cache: `get` returns a shared `Arc` to the cached
/// allocation, visible to every holder.
pub struct HandleCache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, Arc<V>>>,
}

impl<K: Hash + Eq, V> HandleCache<K, V> {
    /// Create a cache holding at most `capacity` entries, or `None` if
    /// `capacity` is 0 (caching disabled).
    pub fn new(capacity: usize) -> Option<Self> {
        let capacity = NonZeroUsize::new(capacity)?;
        Some(Self {
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Look up `key`, promoting it to most-recently-used on a hit.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        let mut entries = self.entries.lock();
        entries.get(key).cloned()
    }

    /// Insert a handle under `key`, evicting the least-recently-used
    /// entry if the cache is full.
    pub fn put(&self, key: K, value: Arc<V>) {
        let mut entries = self.entries.lock();
        entries.put(key, value);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock();
        entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_disables() {
        assert!(ValueCache::<u64, Vec<u8>>::new(0).is_none());
        assert!(HandleCache::<u64, Vec<u8>>::new(0).is_none());
    }

    #[test]
    fn test_lru_eviction() {
        let cache = ValueCache::new(2).unwrap();
        cache.put(1u64, "one");
        cache.put(2u64, "two");
        cache.put(3u64, "three"); // evicts 1

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some("two"));
        assert_eq!(cache.get(&3), Some("three"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_get_promotes() {
        let cache = ValueCache::new(2).unwrap();
        cache.put(1u64, "one");
        cache.put(2u64, "two");

        // Touch 1 so 2 becomes the eviction candidate
        assert_eq!(cache.get(&1), Some("one"));
        cache.put(3u64, "three");

        assert_eq!(cache.get(&1), Some("one"));
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn test_value_cache_returns_independent_copies() {
        let cache = ValueCache::new(4).unwrap();
        cache.put(1u64, vec![1u8, 2, 3]);

        let mut copy = cache.get(&1).unwrap();
        copy.push(0xFF);

        // The cached value is unaffected by the caller's mutation
        assert_eq!(cache.get(&1), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_handle_cache_aliases() {
        let cache = HandleCache::new(4).unwrap();
        cache.put(1u64, Arc::new(vec![1u8, 2, 3]));

        let a = cache.get(&1).unwrap();
        let b = cache.get(&1).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(ValueCache::new(64).unwrap());

        let mut handles = vec![];
        for t in 0..8u64 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..100u64 {
                    cache.put(t * 1000 + i, i);
                    let _ = cache.get(&(t * 1000 + i));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 64);
    }
}
