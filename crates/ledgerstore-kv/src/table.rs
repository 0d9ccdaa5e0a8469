//! Logical tables: disjoint key namespaces over one physical store.
//!
//! A `Table` prefixes every key it writes and strips the prefix from
//! every key it reads back, so two tables opened with distinct
//! equal-length prefixes can never observe each other's entries — for
//! any key content, including empty keys and keys that happen to equal
//! another table's prefix bytes.
//!
//! Tables are cheap, stateless views: opening the same prefix twice
//! yields two independent handles over the same data, and a `Table` is
//! itself a `KvStore`, so views compose.

use std::sync::Arc;

use crate::error::KvResult;
use crate::kv::KvStore;

/// A prefix-scoped view over a shared physical store.
#[derive(Clone)]
pub struct Table {
    store: Arc<dyn KvStore>,
    name: &'static str,
    prefix: Vec<u8>,
}

impl Table {
    /// Open a logical table over `store`.
    ///
    /// `name` is used in logs and errors only; `prefix` defines the
    /// namespace. Callers are responsible for choosing distinct
    /// equal-length prefixes for distinct tables.
    pub fn new(store: Arc<dyn KvStore>, name: &'static str, prefix: &[u8]) -> Self {
        Self {
            store,
            name,
            prefix: prefix.to_vec(),
        }
    }

    /// Table name, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build the physical key: `[prefix][key]`.
    fn prefixed(&self, key: &[u8]) -> Vec<u8> {
        let mut full = Vec::with_capacity(self.prefix.len() + key.len());
        full.extend_from_slice(&self.prefix);
        full.extend_from_slice(key);
        full
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl KvStore for Table {
    fn get(&self, key: &[u8]) -> KvResult<Option<Vec<u8>>> {
        self.store.get(&self.prefixed(key))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> KvResult<()> {
        self.store.put(&self.prefixed(key), value)
    }

    fn delete(&self, key: &[u8]) -> KvResult<()> {
        self.store.delete(&self.prefixed(key))
    }

    fn has(&self, key: &[u8]) -> KvResult<bool> {
        self.store.has(&self.prefixed(key))
    }

    fn for_each(&self, prefix: &[u8], visit: &mut dyn FnMut(&[u8], &[u8])) -> KvResult<()> {
        // The inner store strips the composed prefix, so visited keys
        // are already relative to this table's namespace.
        self.store.for_each(&self.prefixed(prefix), visit)
    }
}
