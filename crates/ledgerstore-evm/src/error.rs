//! Error taxonomy for the persistence façade.
//!
//! Every variant except `TrieFlush` is unrecoverable: it must be logged
//! with context and escalated for the process to halt on. `TrieFlush`
//! alone is returned for the caller to retry or halt.

use std::error::Error;
use std::fmt;

use crate::types::Hash;

/// Persistence façade error.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// A structured value could not be encoded for storage.
    Encoding {
        /// Target table name
        table: &'static str,
        /// Description from the codec
        detail: String,
    },

    /// Stored bytes for a present key could not be decoded.
    ///
    /// Absent keys and empty records are never reported here; this
    /// variant means the table holds bytes that no longer parse.
    Decoding {
        /// Source table name
        table: &'static str,
        /// The key whose value is corrupt
        key: Vec<u8>,
        /// Description from the codec
        detail: String,
    },

    /// The physical store failed an operation.
    Backend {
        /// Table the operation targeted
        table: &'static str,
        /// The operation that failed ("get", "put", "delete", "has", "iter")
        op: &'static str,
        /// Description from the backend
        detail: String,
    },

    /// A state view was requested at a root with no committed snapshot.
    InconsistentRoot {
        /// The unknown root
        root: Hash,
    },

    /// Commit-time flush of pending state nodes failed. Recoverable:
    /// the pending set is retained and the flush may be retried.
    TrieFlush {
        /// Description of the failure
        detail: String,
    },
}

impl StoreError {
    /// Whether this error is in the unrecoverable class.
    ///
    /// Fatal errors must be logged and escalated to a process-level
    /// halt by the caller; only `TrieFlush` may be handled in place.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StoreError::TrieFlush { .. })
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Encoding { table, detail } => {
                write!(f, "failed to encode value for table {}: {}", table, detail)
            }

            StoreError::Decoding { table, key, detail } => {
                write!(
                    f,
                    "corrupt record in table {} at key 0x{}: {}",
                    table,
                    hex::encode(key),
                    detail
                )
            }

            StoreError::Backend { table, op, detail } => {
                write!(f, "backend {} on table {} failed: {}", op, table, detail)
            }

            StoreError::InconsistentRoot { root } => {
                write!(f, "no state snapshot committed for root 0x{}", hex::encode(root))
            }

            StoreError::TrieFlush { detail } => {
                write!(f, "failed to flush state nodes to the main store: {}", detail)
            }
        }
    }
}

impl Error for StoreError {}

/// Result type alias for façade operations.
pub type StoreResult<T> = Result<T, StoreError>;
