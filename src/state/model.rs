use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::LedgerError;
use crate::hashing::hash_jsonable;

/// Public view of an account. Balances are allowed to go negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub public_key: String,
    pub balance: f64,
}

/// Account balances keyed by public key, plus a digest of the whole map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    account_map: HashMap<String, AccountInfo>,
    root_hash: String,
}

impl State {
    pub fn new() -> Self {
        let account_map = HashMap::new();
        let root_hash = hash_jsonable(&account_map);
        Self {
            account_map,
            root_hash,
        }
    }

    pub fn root_hash(&self) -> &str {
        &self.root_hash
    }

    /// Insert or overwrite an account, then rehash the full map.
    pub fn put(&mut self, info: AccountInfo) {
        self.account_map.insert(info.public_key.clone(), info);
        self.update_root_hash();
    }

    pub fn get(&self, public_key: &str) -> Option<&AccountInfo> {
        self.account_map.get(public_key)
    }

    /// Owned copy of an account, or `AccountNotFound`.
    pub fn fetch(&self, public_key: &str) -> Result<AccountInfo, LedgerError> {
        self.get(public_key)
            .cloned()
            .ok_or_else(|| LedgerError::AccountNotFound(public_key.to_string()))
    }

    pub fn contains(&self, public_key: &str) -> bool {
        self.account_map.contains_key(public_key)
    }

    fn update_root_hash(&mut self) {
        // Cost is linear in the number of accounts.
        self.root_hash = hash_jsonable(&self.account_map);
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
