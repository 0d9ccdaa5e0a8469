//! Store configuration.
//!
//! Only the hot-lookup caches are tunable; everything else about the
//! store's layout is fixed at construction.

/// Cache capacities for the store's hot tables.
///
/// A capacity of 0 disables the respective cache entirely — every read
/// falls through to the backing table. That is a valid configuration,
/// not an error.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// LRU capacity for per-block receipt lookups (entries)
    pub receipts_cache: usize,
    /// LRU capacity for transaction-position lookups (entries)
    pub tx_positions_cache: usize,
}

impl StoreConfig {
    /// All caches disabled; every read hits the physical store.
    pub fn no_cache() -> Self {
        Self {
            receipts_cache: 0,
            tx_positions_cache: 0,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            receipts_cache: 512,
            tx_positions_cache: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_caches() {
        let cfg = StoreConfig::default();
        assert!(cfg.receipts_cache > 0);
        assert!(cfg.tx_positions_cache > 0);
    }

    #[test]
    fn test_no_cache_disables_all() {
        let cfg = StoreConfig::no_cache();
        assert_eq!(cfg.receipts_cache, 0);
        assert_eq!(cfg.tx_positions_cache, 0);
    }
}
