use log::{debug, info};

use crate::blockchain::{Block, Blockchain};
use crate::error::LedgerError;
use crate::state::apply_transaction;
use crate::transaction::{Mempool, Transaction, TxType, make_create_account, make_reward_miner};

/// Everything a mining round needs, copied out so the lock can be released
/// before the proof-of-work search.
#[derive(Debug, Clone)]
pub struct MiningInputs {
    pub last_block: Block,
    pub transactions: Vec<Transaction>,
    pub state_hash: String,
}

/// Ledger and mempool. Shared behind one mutex so block application and
/// mempool updates never interleave.
#[derive(Debug, Default)]
pub struct Node {
    pub blockchain: Blockchain,
    pub mempool: Mempool,
}

impl Node {
    pub fn new() -> Self {
        Self {
            blockchain: Blockchain::new(),
            mempool: Mempool::new(),
        }
    }

    /// Commit `block` to the ledger and drop its transactions from the mempool.
    pub fn accept_block(&mut self, block: Block) -> Result<bool, LedgerError> {
        let number = block.header.number;
        let included = block.transactions.clone();
        if !self.blockchain.add_block(block)? {
            return Ok(false);
        }
        let before = self.mempool.len();
        self.mempool.remove(&included);
        info!(
            "LEDGER - committed block #{} ({} txs), height {}, mempool {} -> {}",
            number,
            included.len(),
            self.blockchain.len(),
            before,
            self.mempool.len()
        );
        Ok(true)
    }

    pub fn is_tip(&self, block: &Block) -> bool {
        self.blockchain.last_block().hash() == block.hash()
    }

    pub fn add_transaction(&mut self, tx: Transaction) {
        debug!("MEMPOOL - add {} ({:?})", tx.uuid(), tx.txtype());
        self.mempool.add(tx);
    }

    /// Snapshot tip, pending transactions and state root for a block paying
    /// `beneficiary`. The block ends with the reward; if the beneficiary has no
    /// account yet and none is pending, a CREATE_ACCOUNT for it goes first.
    ///
    /// Pending transactions are tried in arrival order against a scratch copy
    /// of the state. Those that would fail (a TRANSACT naming an account that
    /// does not exist yet) are left out of the block and stay pending.
    pub fn mining_inputs(&self, beneficiary: &str) -> MiningInputs {
        if self.mempool.is_empty() {
            debug!("MINER - mempool empty, block carries the reward only");
        }
        let pending = self.mempool.get_all();
        let creation_pending = pending.iter().any(|tx| {
            tx.txtype() == TxType::CreateAccount && tx.unsigned.pk_recipient == beneficiary
        });

        let mut scratch = self.blockchain.state.clone();
        let mut candidates = Vec::with_capacity(pending.len() + 1);
        if !scratch.contains(beneficiary) && !creation_pending {
            candidates.push(make_create_account(beneficiary));
        }
        candidates.extend(pending);

        let mut transactions = Vec::with_capacity(candidates.len() + 1);
        for tx in candidates {
            match apply_transaction(&mut scratch, &tx) {
                Ok(()) => transactions.push(tx),
                Err(e) => debug!("MINER - deferring {}: {}", tx.uuid(), e),
            }
        }
        transactions.push(make_reward_miner(beneficiary));

        MiningInputs {
            last_block: self.blockchain.last_block().clone(),
            transactions,
            state_hash: self.blockchain.state.root_hash().to_string(),
        }
    }
}
