//! Generic typed accessors over logical tables.
//!
//! Every table stores codec-encoded records; these helpers are the one
//! place encoding, decoding, and backend errors are mapped into the
//! façade's taxonomy and logged with operation/table/key context.
//! All errors returned here are in the fatal class; the caller above
//! decides that "fatal" means halt.

use ledgerstore_kv::{KvError, KvStore, Table};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use crate::codec::{self, CodecError};
use crate::error::{StoreError, StoreResult};

fn backend_err(table: &Table, e: KvError) -> StoreError {
    let KvError::Backend { op, detail } = e;
    error!(table = table.name(), op, %detail, "physical store operation failed");
    StoreError::Backend { table: table.name(), op, detail }
}

/// Encode `value` and write it under `key`.
pub fn set<T: Serialize>(table: &Table, key: &[u8], value: &T) -> StoreResult<()> {
    let raw = codec::encode(value).map_err(|e| {
        error!(table = table.name(), key = %hex::encode(key), err = %e, "failed to encode record");
        StoreError::Encoding { table: table.name(), detail: e.to_string() }
    })?;

    table.put(key, &raw).map_err(|e| backend_err(table, e))
}

/// Read and decode the record under `key`.
///
/// An absent key (or an empty stored record) is `Ok(None)`. Bytes that
/// are present but undecodable are corruption, never silently ignored.
pub fn get<T: DeserializeOwned>(table: &Table, key: &[u8]) -> StoreResult<Option<T>> {
    let raw = table.get(key).map_err(|e| backend_err(table, e))?;

    let Some(raw) = raw else {
        return Ok(None);
    };

    codec::decode(&raw).map_err(|e: CodecError| {
        error!(
            table = table.name(),
            key = %hex::encode(key),
            size = raw.len(),
            err = %e,
            "failed to decode record"
        );
        StoreError::Decoding {
            table: table.name(),
            key: key.to_vec(),
            detail: e.to_string(),
        }
    })
}

/// Existence check, independent of decoding.
pub fn has(table: &Table, key: &[u8]) -> StoreResult<bool> {
    table.has(key).map_err(|e| backend_err(table, e))
}

/// Clear an entire logical table.
///
/// Two-phase: buffer every key observed during iteration, then delete
/// each buffered key. The iteration primitive's behavior under
/// concurrent mutation is undefined, so the buffering is a correctness
/// requirement, not an optimization.
pub fn drop_table(table: &Table) -> StoreResult<()> {
    let mut keys: Vec<Vec<u8>> = Vec::with_capacity(512);
    table
        .for_each(&[], &mut |key, _| keys.push(key.to_vec()))
        .map_err(|e| backend_err(table, e))?;

    for key in &keys {
        table.delete(key).map_err(|e| backend_err(table, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerstore_kv::MemKv;
    use serde::Deserialize;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        seq: u64,
        body: String,
    }

    fn test_table() -> Table {
        Table::new(Arc::new(MemKv::new()), "test", b"t")
    }

    #[test]
    fn test_set_get_roundtrip() {
        let table = test_table();
        let rec = Record { seq: 9, body: "payload".to_string() };

        set(&table, b"k1", &rec).unwrap();
        assert_eq!(get::<Record>(&table, b"k1").unwrap(), Some(rec));
    }

    #[test]
    fn test_get_absent_is_none() {
        let table = test_table();
        assert_eq!(get::<Record>(&table, b"missing").unwrap(), None);
    }

    #[test]
    fn test_empty_stored_record_is_none() {
        let table = test_table();
        table.put(b"k", b"").unwrap();
        assert_eq!(get::<Record>(&table, b"k").unwrap(), None);
    }

    #[test]
    fn test_corrupt_record_is_decoding_error() {
        let table = test_table();
        table.put(b"k", &[0xFF, 0xFF, 0xFF]).unwrap();

        let err = get::<Record>(&table, b"k").unwrap_err();
        assert!(matches!(err, StoreError::Decoding { table: "test", .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_has() {
        let table = test_table();
        assert!(!has(&table, b"k").unwrap());
        set(&table, b"k", &1u32).unwrap();
        assert!(has(&table, b"k").unwrap());
    }

    #[test]
    fn test_drop_table_empties_and_is_reusable() {
        let table = test_table();
        let keys: Vec<Vec<u8>> = (0..20u8).map(|i| vec![i]).collect();
        for key in &keys {
            set(&table, key, &(key[0] as u32)).unwrap();
        }

        drop_table(&table).unwrap();

        for key in &keys {
            assert!(!has(&table, key).unwrap());
        }

        // Table is safe to reuse for new writes
        set(&table, b"fresh", &1u32).unwrap();
        assert_eq!(get::<u32>(&table, b"fresh").unwrap(), Some(1));
    }

    #[test]
    fn test_drop_table_scoped() {
        let store: Arc<MemKv> = Arc::new(MemKv::new());
        let a = Table::new(store.clone(), "a", b"a");
        let b = Table::new(store, "b", b"b");

        set(&a, b"k", &1u32).unwrap();
        set(&b, b"k", &2u32).unwrap();

        drop_table(&a).unwrap();

        assert!(!has(&a, b"k").unwrap());
        assert_eq!(get::<u32>(&b, b"k").unwrap(), Some(2));
    }
}
