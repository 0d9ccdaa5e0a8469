//! LedgerStore EVM — Execution-Layer Persistence Façade
//!
//! Organizes one physical key-value store into logically separate
//! namespaces — receipts, transaction positions, raw transactions,
//! world state, and event-log indices — and exposes typed accessors
//! over them.
//!
//! # Architecture
//!
//! - Each logical table is a one-byte-prefixed view over the shared
//!   physical store; distinct tables never observe each other's keys
//! - Structured records go through one canonical codec; an empty record
//!   reads back as "absent", never as corruption
//! - Hot lookups (receipts, transaction positions) sit behind bounded
//!   LRU caches — receipts by value, positions by shared handle
//! - World state is snapshot-addressed: views open at historical roots,
//!   commits stage pending nodes, one flush-everything call makes them
//!   durable
//!
//! # Error policy
//!
//! Codec, backend, and unknown-root failures are fatal-class: logged
//! with context and escalated for the process to halt on. Only the
//! commit-time flush returns a recoverable error.

pub mod accessor;
pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod logindex;
pub mod state;
pub mod store;
pub mod types;

// Re-export key types for convenience
pub use cache::{HandleCache, ValueCache};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use logindex::LogIndex;
pub use state::{StateDb, StateView, EMPTY_ROOT};
pub use store::Store;
pub use types::{Account, Address, Hash, LogRecord, Receipt, Transaction, TxPosition};
