use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blockchain::MINING_REWARD;
use crate::error::WalletError;
use crate::hashing::hash_jsonable;
use crate::wallet::{Account, digest_bytes, verify_signature_hex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxType {
    CreateAccount,
    Transact,
    RewardMiner,
}

/// The signed part of a transaction. System-issued kinds leave `pk_sender` empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnsignedTransaction {
    pub pk_sender: String,
    pub pk_recipient: String,
    pub value: f64,
    pub txtype: TxType,
    pub uuid: String,
}

impl UnsignedTransaction {
    pub fn hash(&self) -> String {
        hash_jsonable(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "ut")]
    pub unsigned: UnsignedTransaction,
    /// Hex DER signature over `unsigned.hash()`; empty for system-issued kinds.
    pub signature: String,
}

impl Transaction {
    pub fn uuid(&self) -> &str {
        &self.unsigned.uuid
    }

    pub fn txtype(&self) -> TxType {
        self.unsigned.txtype
    }

    /// Verify the signature against the sender key. Malformed keys or
    /// signatures count as a failed verification.
    pub fn check_signature(&self) -> bool {
        let result = digest_bytes(&self.unsigned.hash()).and_then(|msg| {
            verify_signature_hex(&self.unsigned.pk_sender, &self.signature, msg)
        });
        match result {
            Ok(valid) => valid,
            Err(e) => {
                debug!("signature check failed for tx {}: {}", self.uuid(), e);
                false
            }
        }
    }
}

fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Signed transfer of `value` from `account` to `pk_recipient`.
pub fn make_send(
    account: &Account,
    value: f64,
    pk_recipient: &str,
) -> Result<Transaction, WalletError> {
    let unsigned = UnsignedTransaction {
        pk_sender: account.public_key().to_string(),
        pk_recipient: pk_recipient.to_string(),
        value,
        txtype: TxType::Transact,
        uuid: new_uuid(),
    };
    let signature = account.sign(digest_bytes(&unsigned.hash())?)?;
    Ok(Transaction {
        unsigned,
        signature,
    })
}

pub fn make_create_account(pk: &str) -> Transaction {
    Transaction {
        unsigned: UnsignedTransaction {
            pk_sender: String::new(),
            pk_recipient: pk.to_string(),
            value: 0.0,
            txtype: TxType::CreateAccount,
            uuid: new_uuid(),
        },
        signature: String::new(),
    }
}

pub fn make_reward_miner(pk: &str) -> Transaction {
    Transaction {
        unsigned: UnsignedTransaction {
            pk_sender: String::new(),
            pk_recipient: pk.to_string(),
            value: MINING_REWARD,
            txtype: TxType::RewardMiner,
            uuid: new_uuid(),
        },
        signature: String::new(),
    }
}
