use log::{debug, warn};
use serde::Serialize;

use super::Block;
use crate::error::LedgerError;
use crate::state::{State, run_transactions};

/// In-memory chain plus the account state derived from replaying it.
#[derive(Debug, Clone, Serialize)]
pub struct Blockchain {
    pub chain: Vec<Block>,
    pub state: State,
}

/// A block may follow `last_block` iff it names it as parent. A block
/// numbered `u64::MAX` could never be extended and is refused.
pub fn validate_block(last_block: &Block, block: &Block) -> bool {
    block.header.parent_hash == last_block.hash() && block.header.number != u64::MAX
}

impl Blockchain {
    /// Initialize a new blockchain with the genesis block and an empty state.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            state: State::new(),
        }
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    /// Append `block` if it links to the tip, then apply its transactions.
    ///
    /// `Ok(false)` means the block was rejected and nothing changed. An `Err`
    /// means the block was appended but its transactions could not all be
    /// applied; chain and state have diverged and the caller must not carry on.
    pub fn add_block(&mut self, block: Block) -> Result<bool, LedgerError> {
        if !validate_block(self.last_block(), &block) {
            debug!(
                "rejected block #{}: parent {} is not the tip",
                block.header.number, block.header.parent_hash
            );
            return Ok(false);
        }
        let height = self.chain.len();
        self.chain.push(block);
        run_transactions(&mut self.state, &self.chain[height].transactions)?;
        Ok(true)
    }

    /// Swap in `candidate` if it starts at genesis and every consecutive pair
    /// links by parent hash. The candidate is replayed against a fresh state;
    /// chain and state are replaced together or not at all.
    ///
    /// Linkage is the only rule: no proof-of-work or length comparison.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        let Some(first) = candidate.first() else {
            warn!("replace_chain: empty candidate");
            return false;
        };
        if first.hash() != Block::genesis().hash() {
            warn!("replace_chain: candidate does not start at genesis");
            return false;
        }

        let mut state = State::new();
        for pair in candidate.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if !validate_block(prev, next) {
                warn!(
                    "replace_chain: block #{} does not link to its predecessor",
                    next.header.number
                );
                return false;
            }
            if let Err(e) = run_transactions(&mut state, &next.transactions) {
                warn!(
                    "replace_chain: block #{} fails to replay: {}",
                    next.header.number, e
                );
                return false;
            }
        }

        self.chain = candidate;
        self.state = state;
        true
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}
