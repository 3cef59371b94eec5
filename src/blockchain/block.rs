use serde::{Deserialize, Serialize};

use crate::hashing::hash_jsonable;
use crate::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub parent_hash: String,
    /// Public key credited with the mining reward.
    pub beneficiary: String,
    /// A random header qualifies with probability 1/difficulty.
    pub difficulty: f64,
    pub number: u64,
    pub timestamp: f64, // seconds since unix epoch
    pub nonce: u64,
    pub transactions_hash: String,
    /// State root before this block's transactions are applied.
    pub state_hash: String,
}

/// A header plus the ordered transactions it commits to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl BlockHeader {
    pub fn hash(&self) -> String {
        hash_jsonable(self)
    }
}

impl Block {
    /// Block identity: the canonical hash of its header.
    pub fn hash(&self) -> String {
        self.header.hash()
    }

    /// The fixed first block shared by every replica.
    pub fn genesis() -> Self {
        Self {
            header: BlockHeader {
                parent_hash: "--genesis-parent-hash--".into(),
                beneficiary: "--genesis-beneficiary--".into(),
                difficulty: 100.0,
                number: 0,
                timestamp: 0.0,
                nonce: 0,
                transactions_hash: "--genesis-transactions-root-".into(),
                state_hash: "--genesis-state-root--".into(),
            },
            transactions: Vec::new(),
        }
    }
}

pub fn hash_transactions(transactions: &[Transaction]) -> String {
    hash_jsonable(transactions)
}
