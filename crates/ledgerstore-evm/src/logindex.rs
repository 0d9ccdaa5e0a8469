//! Topic-indexed event log store.
//!
//! Records live under a fixed 16-byte position key
//! (`block ++ tx_index ++ log_index`, big-endian); each topic adds a
//! 48-byte index entry (`topic ++ position key`) whose value is the
//! position key. The two key lengths cannot shadow each other, and
//! topic-prefix iteration finds exactly the records carrying a topic.
//!
//! The index is append-only: pushed records are never individually
//! removed. `wipe` resets the whole namespace.

use ledgerstore_kv::{KvStore, Table};

use crate::accessor;
use crate::error::StoreResult;
use crate::types::{Hash, LogRecord};

const RECORD_KEY_LEN: usize = 16;

fn record_key(rec: &LogRecord) -> [u8; RECORD_KEY_LEN] {
    let mut key = [0u8; RECORD_KEY_LEN];
    key[..8].copy_from_slice(&rec.block.to_be_bytes());
    key[8..12].copy_from_slice(&rec.tx_index.to_be_bytes());
    key[12..].copy_from_slice(&rec.log_index.to_be_bytes());
    key
}

fn topic_key(topic: &Hash, record_key: &[u8; RECORD_KEY_LEN]) -> Vec<u8> {
    let mut key = Vec::with_capacity(32 + RECORD_KEY_LEN);
    key.extend_from_slice(topic);
    key.extend_from_slice(record_key);
    key
}

/// Append-only, topic-searchable index over emitted event records.
pub struct LogIndex {
    table: Table,
}

impl LogIndex {
    /// Wire the index over its table.
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    /// Append records and their topic index entries.
    pub fn push(&self, records: &[LogRecord]) -> StoreResult<()> {
        for rec in records {
            let rk = record_key(rec);
            accessor::set(&self.table, &rk, rec)?;

            for topic in &rec.topics {
                self.table
                    .put(&topic_key(topic, &rk), &rk)
                    .map_err(|e| crate::error::StoreError::Backend {
                        table: self.table.name(),
                        op: "put",
                        detail: e.to_string(),
                    })?;
            }
        }
        Ok(())
    }

    /// All records carrying `topic`, in position order.
    pub fn by_topic(&self, topic: &Hash) -> StoreResult<Vec<LogRecord>> {
        let mut record_keys: Vec<Vec<u8>> = Vec::new();
        self.table
            .for_each(topic, &mut |_, rk| record_keys.push(rk.to_vec()))
            .map_err(|e| crate::error::StoreError::Backend {
                table: self.table.name(),
                op: "iter",
                detail: e.to_string(),
            })?;

        let mut records = Vec::with_capacity(record_keys.len());
        for rk in &record_keys {
            if let Some(rec) = accessor::get::<LogRecord>(&self.table, rk)? {
                records.push(rec);
            }
        }
        Ok(records)
    }

    /// Reset the entire index (records and topic entries).
    pub fn wipe(&self) -> StoreResult<()> {
        accessor::drop_table(&self.table)
    }
}
