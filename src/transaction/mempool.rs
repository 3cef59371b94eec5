use indexmap::IndexMap;

use super::model::Transaction;

/// Pending transactions keyed by uuid, in arrival order. A later `add` with
/// the same uuid replaces the earlier one in place.
#[derive(Debug, Default)]
pub struct Mempool {
    transactions: IndexMap<String, Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self {
            transactions: IndexMap::new(),
        }
    }

    pub fn add(&mut self, transaction: Transaction) {
        self.transactions
            .insert(transaction.uuid().to_string(), transaction);
    }

    /// Snapshot of everything pending, oldest first.
    pub fn get_all(&self) -> Vec<Transaction> {
        self.transactions.values().cloned().collect()
    }

    /// Drop the listed transactions; unknown uuids are ignored.
    pub fn remove(&mut self, transactions: &[Transaction]) {
        for tx in transactions {
            self.transactions.shift_remove(tx.uuid());
        }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn uuids(&self) -> impl Iterator<Item = &str> {
        self.transactions.keys().map(String::as_str)
    }
}
