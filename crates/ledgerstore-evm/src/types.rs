//! Execution-layer record types stored by the façade.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// 32-byte content hash (state roots, transaction hashes, log topics).
pub type Hash = [u8; 32];

/// 20-byte account address.
pub type Address = [u8; 20];

/// Keccak-256 of `data`.
pub fn keccak(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// A raw transaction as submitted to the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    /// `None` for contract creation
    pub to: Option<Address>,
    pub value: u128,
    pub input: Vec<u8>,
}

/// Execution receipt for one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// 1 on success, 0 on revert
    pub status: u8,
    pub cumulative_gas_used: u64,
    pub logs: Vec<LogRecord>,
}

/// Where a transaction landed: which block, at which offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPosition {
    pub block: u64,
    pub block_offset: u32,
}

/// An emitted event record, indexed by topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub address: Address,
    pub topics: Vec<Hash>,
    pub data: Vec<u8>,
    pub block: u64,
    pub tx_index: u32,
    pub log_index: u32,
}

/// One account's world state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub nonce: u64,
    pub balance: u128,
    pub code: Vec<u8>,
    pub storage: BTreeMap<Hash, Hash>,
}
