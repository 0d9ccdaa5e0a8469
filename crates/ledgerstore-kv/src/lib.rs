//! LedgerStore KV — Physical Key-Value Layer
//!
//! The byte-level foundation the execution-layer persistence façade is
//! built on: one flat physical key space, partitioned into disjoint
//! logical tables by key prefixing.
//!
//! # Architecture
//!
//! - **`KvStore` trait**: get/put/delete/has + prefix iteration, the
//!   complete contract a physical backend must satisfy
//! - **`MemKv`**: RAM reference engine (RwLock + hash table)
//! - **`Table`**: prefix-scoped view over a shared store; tables with
//!   distinct prefixes never observe each other's keys
//!
//! # Zero Execution-Layer Dependencies
//!
//! This crate has no receipt, transaction, or state types and no codec.
//! It can partition any key-value workload. Execution-layer semantics
//! live in separate crates (e.g. ledgerstore-evm).

pub mod engine;
pub mod error;
pub mod kv;
pub mod table;

// Re-export key types for convenience
pub use engine::MemKv;
pub use error::{KvError, KvResult};
pub use kv::KvStore;
pub use table::Table;
