//! The store manager: one object wiring tables, caches, world state,
//! and the log index over a single physical store.
//!
//! `Store` is the sole construction point. It opens every logical table
//! with its fixed one-byte prefix, builds the configured caches, and
//! owns the one mutex dedicated to increment-style read-modify-write
//! sequences. Everything else is safe for concurrent use without it.

use std::sync::Arc;

use ledgerstore_kv::{KvStore, Table};
use parking_lot::Mutex;
use tracing::error;

use crate::accessor;
use crate::cache::{HandleCache, ValueCache};
use crate::codec;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::logindex::LogIndex;
use crate::state::{StateDb, StateView};
use crate::types::{keccak, Hash, LogRecord, Receipt, Transaction, TxPosition};

/// Node persistent storage working over a physical key-value store.
pub struct Store {
    cfg: StoreConfig,

    // Logical tables, one fixed prefix each
    receipts: Table,
    tx_positions: Table,
    txs: Table,

    state: StateDb,
    logs: LogIndex,

    // Hot-lookup caches; None when disabled by config.
    // Receipts are cached by value: a caller mutating its copy must
    // never affect other readers. Positions are cached by handle.
    receipts_cache: Option<ValueCache<u64, Vec<Receipt>>>,
    tx_positions_cache: Option<HandleCache<Hash, TxPosition>>,

    /// Serializes increment-style counter sequences only; never held
    /// across unrelated I/O.
    inc: Mutex<()>,
}

impl Store {
    /// Create the store over a physical key-value database.
    pub fn new(db: Arc<dyn KvStore>, cfg: StoreConfig) -> Self {
        let receipts = Table::new(db.clone(), "receipts", b"r");
        let tx_positions = Table::new(db.clone(), "tx_positions", b"x");
        let txs = Table::new(db.clone(), "txs", b"X");
        let state = StateDb::new(Table::new(db.clone(), "state", b"M"));
        let logs = LogIndex::new(Table::new(db, "logs", b"L"));

        let receipts_cache = ValueCache::new(cfg.receipts_cache);
        let tx_positions_cache = HandleCache::new(cfg.tx_positions_cache);

        Self {
            cfg,
            receipts,
            tx_positions,
            txs,
            state,
            logs,
            receipts_cache,
            tx_positions_cache,
            inc: Mutex::new(()),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    // -----------------------------------------------------------------
    // Receipts
    // -----------------------------------------------------------------

    /// Store the receipts of one block.
    pub fn set_receipts(&self, block: u64, receipts: &[Receipt]) -> StoreResult<()> {
        accessor::set(&self.receipts, &block.to_be_bytes(), &receipts)?;

        if let Some(cache) = &self.receipts_cache {
            cache.put(block, receipts.to_vec());
        }
        Ok(())
    }

    /// The receipts of one block; cached by value.
    pub fn receipts(&self, block: u64) -> StoreResult<Option<Vec<Receipt>>> {
        if let Some(cache) = &self.receipts_cache {
            if let Some(receipts) = cache.get(&block) {
                return Ok(Some(receipts));
            }
        }

        let receipts: Option<Vec<Receipt>> =
            accessor::get(&self.receipts, &block.to_be_bytes())?;

        if let (Some(cache), Some(receipts)) = (&self.receipts_cache, &receipts) {
            cache.put(block, receipts.clone());
        }
        Ok(receipts)
    }

    // -----------------------------------------------------------------
    // Raw transactions
    // -----------------------------------------------------------------

    /// Store a raw transaction under the hash of its canonical encoding.
    /// Returns the hash.
    pub fn set_tx(&self, tx: &Transaction) -> StoreResult<Hash> {
        let raw = codec::encode(tx).map_err(|e| {
            error!(table = self.txs.name(), err = %e, "failed to encode transaction");
            StoreError::Encoding { table: self.txs.name(), detail: e.to_string() }
        })?;
        let hash = keccak(&raw);

        self.txs.put(&hash, &raw).map_err(|e| {
            error!(table = self.txs.name(), key = %hex::encode(hash), err = %e, "failed to put transaction");
            StoreError::Backend { table: self.txs.name(), op: "put", detail: e.to_string() }
        })?;
        Ok(hash)
    }

    /// The raw transaction stored under `hash`.
    pub fn tx(&self, hash: &Hash) -> StoreResult<Option<Transaction>> {
        accessor::get(&self.txs, hash)
    }

    /// Whether a transaction is stored under `hash`.
    pub fn has_tx(&self, hash: &Hash) -> StoreResult<bool> {
        accessor::has(&self.txs, hash)
    }

    // -----------------------------------------------------------------
    // Transaction positions
    // -----------------------------------------------------------------

    /// Record where a transaction landed.
    pub fn set_tx_position(&self, hash: Hash, pos: TxPosition) -> StoreResult<()> {
        accessor::set(&self.tx_positions, &hash, &pos)?;

        if let Some(cache) = &self.tx_positions_cache {
            cache.put(hash, Arc::new(pos));
        }
        Ok(())
    }

    /// The position of transaction `hash`; cached by shared handle.
    pub fn tx_position(&self, hash: &Hash) -> StoreResult<Option<Arc<TxPosition>>> {
        if let Some(cache) = &self.tx_positions_cache {
            if let Some(pos) = cache.get(hash) {
                return Ok(Some(pos));
            }
        }

        let pos: Option<TxPosition> = accessor::get(&self.tx_positions, hash)?;
        let pos = pos.map(Arc::new);

        if let (Some(cache), Some(pos)) = (&self.tx_positions_cache, &pos) {
            cache.put(*hash, Arc::clone(pos));
        }
        Ok(pos)
    }

    /// Allocate the next transaction offset within `block`.
    ///
    /// The counter lives in the positions table under the 8-byte block
    /// key (position records use 32-byte hashes, so the key spaces are
    /// disjoint). The read-modify-write sequence is serialized by the
    /// dedicated increment mutex; without it two concurrent callers
    /// could be assigned the same offset.
    pub fn next_tx_index(&self, block: u64) -> StoreResult<u32> {
        let _guard = self.inc.lock();

        let key = block.to_be_bytes();
        let next: u32 = accessor::get(&self.tx_positions, &key)?.unwrap_or(0);
        accessor::set(&self.tx_positions, &key, &(next + 1))?;
        Ok(next)
    }

    // -----------------------------------------------------------------
    // World state and logs
    // -----------------------------------------------------------------

    /// Open the world state at `root`.
    pub fn state_at(&self, root: Hash) -> StoreResult<StateView> {
        self.state.state_at(root)
    }

    /// Seal a state view into a pending snapshot; returns its root.
    pub fn commit_state(&self, view: &StateView) -> StoreResult<Hash> {
        self.state.commit(view)
    }

    /// Flush all pending state nodes to the physical store.
    ///
    /// The one recoverable failure in the façade: on error the pending
    /// set is retained and the caller decides whether to retry or halt.
    pub fn commit(&self) -> StoreResult<()> {
        if let Err(e) = self.state.flush() {
            error!(err = %e, "failed to flush state nodes into main store");
            return Err(e);
        }
        Ok(())
    }

    /// Push event records into the log index.
    pub fn index_logs(&self, records: &[LogRecord]) -> StoreResult<()> {
        self.logs.push(records)
    }

    /// The state façade.
    pub fn state(&self) -> &StateDb {
        &self.state
    }

    /// The log index.
    pub fn logs(&self) -> &LogIndex {
        &self.logs
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("cfg", &self.cfg)
            .field("pending_state_nodes", &self.state.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerstore_kv::MemKv;

    fn test_store(cfg: StoreConfig) -> (Store, Arc<MemKv>) {
        let db = Arc::new(MemKv::new());
        (Store::new(db.clone(), cfg), db)
    }

    fn receipt(gas: u64) -> Receipt {
        Receipt { status: 1, cumulative_gas_used: gas, logs: vec![] }
    }

    #[test]
    fn test_receipts_roundtrip() {
        let (store, _) = test_store(StoreConfig::default());

        store.set_receipts(1, &[receipt(21000), receipt(42000)]).unwrap();
        let got = store.receipts(1).unwrap().unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[1].cumulative_gas_used, 42000);

        assert_eq!(store.receipts(2).unwrap(), None);
    }

    #[test]
    fn test_receipts_without_cache() {
        let (store, _) = test_store(StoreConfig::no_cache());

        store.set_receipts(1, &[receipt(21000)]).unwrap();
        assert_eq!(store.receipts(1).unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_tx_roundtrip() {
        let (store, _) = test_store(StoreConfig::default());

        let tx = Transaction {
            nonce: 0,
            gas_price: 10,
            gas_limit: 21000,
            to: Some([0x22; 20]),
            value: 1_000_000,
            input: vec![],
        };

        let hash = store.set_tx(&tx).unwrap();
        assert!(store.has_tx(&hash).unwrap());
        assert_eq!(store.tx(&hash).unwrap(), Some(tx));
        assert!(!store.has_tx(&[0u8; 32]).unwrap());
    }

    #[test]
    fn test_tx_position_shared_handle() {
        let (store, _) = test_store(StoreConfig::default());
        let hash = [0x33; 32];

        store.set_tx_position(hash, TxPosition { block: 7, block_offset: 2 }).unwrap();

        let a = store.tx_position(&hash).unwrap().unwrap();
        let b = store.tx_position(&hash).unwrap().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.block, 7);
    }

    #[test]
    fn test_tx_position_fills_cache_from_table() {
        let db = Arc::new(MemKv::new());
        let hash = [0x44; 32];

        // Written through a store with caching disabled
        let writer = Store::new(db.clone(), StoreConfig::no_cache());
        writer.set_tx_position(hash, TxPosition { block: 1, block_offset: 0 }).unwrap();

        // Read through a caching store over the same physical db
        let reader = Store::new(db, StoreConfig::default());
        let a = reader.tx_position(&hash).unwrap().unwrap();
        let b = reader.tx_position(&hash).unwrap().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_next_tx_index_sequential() {
        let (store, _) = test_store(StoreConfig::default());

        assert_eq!(store.next_tx_index(5).unwrap(), 0);
        assert_eq!(store.next_tx_index(5).unwrap(), 1);
        assert_eq!(store.next_tx_index(5).unwrap(), 2);
        // Independent per block
        assert_eq!(store.next_tx_index(6).unwrap(), 0);
    }

    #[test]
    fn test_counter_and_positions_share_table_without_collision() {
        let (store, _) = test_store(StoreConfig::no_cache());

        store.next_tx_index(5).unwrap();
        let hash = [0x55; 32];
        store.set_tx_position(hash, TxPosition { block: 5, block_offset: 0 }).unwrap();

        assert_eq!(store.next_tx_index(5).unwrap(), 1);
        assert_eq!(store.tx_position(&hash).unwrap().unwrap().block, 5);
    }

    #[test]
    fn test_namespaces_are_disjoint() {
        let (store, db) = test_store(StoreConfig::no_cache());

        store.set_receipts(1, &[receipt(1)]).unwrap();
        let tx = Transaction {
            nonce: 0,
            gas_price: 0,
            gas_limit: 0,
            to: None,
            value: 0,
            input: vec![],
        };
        store.set_tx(&tx).unwrap();

        // Two tables, two physical keys, no overlap
        assert_eq!(db.len(), 2);
        assert_eq!(store.receipts(1).unwrap().unwrap().len(), 1);
    }
}
