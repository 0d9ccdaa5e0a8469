//! World-state façade: open a state view at a historical root, commit
//! views into pending snapshot nodes, flush nodes to the main store.
//!
//! Snapshots are content-addressed: a view's root is the Keccak-256 of
//! its canonical encoding, and the encoded snapshot is stored under the
//! root in the state table. Opening a root that was never committed is a
//! consistency violation, not an empty state.
//!
//! `flush` is a flush-everything commit: all pending nodes go to the
//! physical store and none are retained in memory, trading memory for
//! guaranteed durability at commit boundaries. It is the one recoverable
//! operation in the façade — on failure the pending set is kept intact
//! so the caller can retry.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use ledgerstore_kv::{KvStore, Table};
use parking_lot::Mutex;
use tracing::error;

use crate::accessor;
use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::types::{keccak, Account, Address, Hash};

/// Root of the empty world state.
pub const EMPTY_ROOT: Hash = [0u8; 32];

/// Account map in canonical (ordered) form, so the encoding — and
/// therefore the root — is deterministic.
type WorldState = BTreeMap<Address, Account>;

/// A mutable in-memory view of world state at one snapshot.
///
/// Views are plain values: cheap to open from a root, mutated freely,
/// and sealed into a new snapshot with [`StateDb::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateView {
    accounts: WorldState,
}

impl StateView {
    fn from_accounts(accounts: WorldState) -> Self {
        Self { accounts }
    }

    /// The account at `addr`, if it exists in this snapshot.
    pub fn account(&self, addr: &Address) -> Option<&Account> {
        self.accounts.get(addr)
    }

    /// Insert or replace the account at `addr`.
    pub fn set_account(&mut self, addr: Address, account: Account) {
        self.accounts.insert(addr, account);
    }

    /// Balance of `addr`; zero for absent accounts.
    pub fn balance(&self, addr: &Address) -> u128 {
        self.accounts.get(addr).map_or(0, |a| a.balance)
    }

    pub fn set_balance(&mut self, addr: Address, balance: u128) {
        self.accounts.entry(addr).or_default().balance = balance;
    }

    /// Nonce of `addr`; zero for absent accounts.
    pub fn nonce(&self, addr: &Address) -> u64 {
        self.accounts.get(addr).map_or(0, |a| a.nonce)
    }

    pub fn set_nonce(&mut self, addr: Address, nonce: u64) {
        self.accounts.entry(addr).or_default().nonce = nonce;
    }

    /// Storage slot `slot` of `addr`; the zero word for absent slots.
    pub fn storage_at(&self, addr: &Address, slot: &Hash) -> Hash {
        self.accounts
            .get(addr)
            .and_then(|a| a.storage.get(slot))
            .copied()
            .unwrap_or([0u8; 32])
    }

    pub fn set_storage(&mut self, addr: Address, slot: Hash, value: Hash) {
        self.accounts.entry(addr).or_default().storage.insert(slot, value);
    }

    /// Number of accounts in the view.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Snapshot store over the state table.
pub struct StateDb {
    table: Table,
    /// Committed-but-unflushed snapshot nodes, keyed by root
    pending: Mutex<HashMap<Hash, Vec<u8>>>,
}

impl StateDb {
    /// Wire the façade over its table.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Open the world state at `root`.
    ///
    /// Serves pending (committed-but-unflushed) snapshots as well as
    /// flushed ones. A root with no snapshot in either place means the
    /// caller requested a state that was never produced or has been
    /// pruned unexpectedly — an unrecoverable consistency violation.
    pub fn state_at(&self, root: Hash) -> StoreResult<StateView> {
        if root == EMPTY_ROOT {
            return Ok(StateView::default());
        }

        let raw = {
            let pending = self.pending.lock();
            pending.get(&root).cloned()
        };

        if let Some(raw) = raw {
            let accounts = codec::decode::<WorldState>(&raw)
                .map_err(|e| StoreError::Decoding {
                    table: self.table.name(),
                    key: root.to_vec(),
                    detail: e.to_string(),
                })?
                .ok_or(StoreError::InconsistentRoot { root })?;
            return Ok(StateView::from_accounts(accounts));
        }

        match accessor::get::<WorldState>(&self.table, &root)? {
            Some(accounts) => Ok(StateView::from_accounts(accounts)),
            None => {
                error!(root = %hex::encode(root), "requested state at unknown root");
                Err(StoreError::InconsistentRoot { root })
            }
        }
    }

    /// Seal `view` into a pending snapshot node and return its root.
    ///
    /// The node becomes durable on the next [`flush`](Self::flush);
    /// until then `state_at` serves it from memory.
    pub fn commit(&self, view: &StateView) -> StoreResult<Hash> {
        if view.accounts.is_empty() {
            return Ok(EMPTY_ROOT);
        }

        let raw = codec::encode(&view.accounts).map_err(|e| StoreError::Encoding {
            table: self.table.name(),
            detail: e.to_string(),
        })?;
        let root = keccak(&raw);

        let mut pending = self.pending.lock();
        pending.insert(root, raw);
        Ok(root)
    }

    /// Number of committed-but-unflushed snapshot nodes.
    pub fn pending_count(&self) -> usize {
        let pending = self.pending.lock();
        pending.len()
    }

    /// Flush every pending node to the physical store, retaining none.
    ///
    /// With zero pending nodes this is a no-op on the physical store.
    /// On failure the unflushed nodes stay pending and the error is
    /// returned for the caller to retry or halt on.
    pub fn flush(&self) -> StoreResult<()> {
        let mut pending = self.pending.lock();

        let nodes: Vec<(Hash, Vec<u8>)> = pending.drain().collect();
        for (i, (root, raw)) in nodes.iter().enumerate() {
            if let Err(e) = self.table.put(root, raw) {
                // Keep everything not yet written, this node included
                for (root, raw) in &nodes[i..] {
                    pending.insert(*root, raw.clone());
                }
                return Err(StoreError::TrieFlush { detail: e.to_string() });
            }
        }
        Ok(())
    }
}
