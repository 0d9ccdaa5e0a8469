//! In-memory reference engine.
//!
//! `MemKv` keeps the whole key space in a RAM hash table behind a RwLock.
//! It is the backend used by the test suites and by deployments that
//! layer durability elsewhere; production nodes plug a disk-backed
//! engine in through the same `KvStore` trait.
//!
//! **Read path**: shared read lock, multiple concurrent readers.
//! **Write path**: brief exclusive lock per mutation.

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::error::KvResult;
use crate::kv::KvStore;

/// RAM-only key-value store.
///
/// All methods take `&self`; the internal RwLock makes a single instance
/// safe to share across threads behind an `Arc`.
pub struct MemKv {
    /// RAM working set — concurrent reads via RwLock
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemKv {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Number of key-value pairs.
    pub fn len(&self) -> usize {
        let data = self.data.read();
        data.len()
    }

    /// Returns true if the store has no entries.
    pub fn is_empty(&self) -> bool {
        let data = self.data.read();
        data.is_empty()
    }
}

impl Default for MemKv {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemKv {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        let data = self.data.read();
        Ok(data.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        let mut data = self.data.write();
        data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> KvResult<()> {
        let mut data = self.data.write();
        data.remove(key);
        Ok(())
    }

    fn has(&self, key: &[u8]) -> KvResult<bool> {
        let data = self.data.read();
        Ok(data.contains_key(key))
    }

    fn for_each(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8], &[u8])) -> KvResult<()> {
        // Snapshot matching entries under the read lock, visit after
        // releasing it. Sorted so iteration order is stable.
        let mut entries: Vec<(Vec<u8>, Vec<u8>)> = {
            let data = self.data.read();
            data.iter()
                .filter(|(k, _)| k.starts_with(prefix))
                .map(|(k, v)| (k[prefix.len()..].to_vec(), v.clone()))
                .collect()
        };
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        for (key, value) in &entries {
            visit(key, value);
        }
        Ok(())
    }
}
