//! Error types for the physical key-value layer.
//!
//! Backend failures carry the failed operation name and a description so
//! callers can log them with full context before deciding how to react.

use std::error::Error;
use std::fmt;

/// Physical key-value store error.
#[derive(Debug, Clone)]
pub enum KvError {
    /// The backend failed a get/put/delete/has/iterate call.
    Backend {
        /// The operation that failed ("get", "put", "delete", "has", "iter")
        op: &'static str,
        /// Human-readable description from the backend
        detail: String,
    },
}

impl fmt::Display for KvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvError::Backend { op, detail } => {
                write!(f, "backend {} failed: {}", op, detail)
            }
        }
    }
}

impl Error for KvError {}

/// Result type alias for physical store operations.
pub type KvResult<T> = Result<T, KvError>;
