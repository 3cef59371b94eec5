use chrono::Utc;
use log::debug;
use num_bigint::BigUint;
use num_traits::{FromPrimitive, One, Zero};

use super::block::{Block, BlockHeader, hash_transactions};
use super::MINE_RATE;
use crate::hashing::int_from_hexstr;
use crate::transaction::Transaction;

/// Bit width of a block hash; the largest hash value is 2^256 - 1.
const HASH_BITS: u32 = 256;

/// Current time as fractional seconds since the unix epoch.
pub fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

pub fn max_hash_value() -> BigUint {
    BigUint::one() << HASH_BITS
}

/// `MAX_HASH_VALUE / difficulty`, truncated.
pub fn target_for(difficulty: f64) -> BigUint {
    if difficulty.is_nan() || difficulty <= 0.0 {
        return BigUint::zero();
    }
    let target = 2f64.powi(HASH_BITS as i32) / difficulty;
    if target.is_infinite() {
        return max_hash_value();
    }
    BigUint::from_f64(target).unwrap_or_default()
}

/// Whether the header's own hash is under the target its difficulty sets.
pub fn meets_target(header: &BlockHeader) -> bool {
    match int_from_hexstr(&header.hash()) {
        Some(value) => value < target_for(header.difficulty),
        None => false,
    }
}

/// 0.7x when the last block came slower than `MINE_RATE`, 1.3x otherwise.
/// No floor or ceiling is applied.
pub fn adjust_difficulty(last_block: &Block, timestamp: f64) -> f64 {
    let elapsed = timestamp - last_block.header.timestamp;
    let scale = if elapsed > MINE_RATE { 0.7 } else { 1.3 };
    scale * last_block.header.difficulty
}

/// Build a block on top of `last_block` and search nonces until its hash is
/// under target. Blocks the calling thread until a solution is found.
pub fn mine_block(
    last_block: &Block,
    beneficiary: &str,
    transactions: Vec<Transaction>,
    state_hash: &str,
) -> Block {
    mine_block_at(last_block, beneficiary, transactions, state_hash, now_secs())
}

pub fn mine_block_at(
    last_block: &Block,
    beneficiary: &str,
    transactions: Vec<Transaction>,
    state_hash: &str,
    timestamp: f64,
) -> Block {
    let mut header = BlockHeader {
        parent_hash: last_block.hash(),
        beneficiary: beneficiary.to_string(),
        difficulty: adjust_difficulty(last_block, timestamp),
        // validate_block refuses a tip at u64::MAX, so this never saturates on
        // a committed chain.
        number: last_block.header.number.saturating_add(1),
        timestamp,
        nonce: 0,
        transactions_hash: hash_transactions(&transactions),
        state_hash: state_hash.to_string(),
    };
    let mut attempts: u64 = 0;
    loop {
        attempts += 1;
        header.nonce = rand::random::<u64>();
        if meets_target(&header) {
            break;
        }
    }
    debug!(
        "MINER - block #{} solved after {} attempts (difficulty={:.3})",
        header.number, attempts, header.difficulty
    );

    Block {
        header,
        transactions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::make_create_account;

    fn block_at(timestamp: f64, difficulty: f64) -> Block {
        let mut b = Block::genesis();
        b.header.timestamp = timestamp;
        b.header.difficulty = difficulty;
        b
    }

    #[test]
    fn slow_blocks_lower_difficulty() {
        let last = block_at(1000.0, 10.0);
        assert_eq!(adjust_difficulty(&last, 1002.0), 0.7 * 10.0);
    }

    #[test]
    fn fast_blocks_raise_difficulty() {
        let last = block_at(1000.0, 10.0);
        assert_eq!(adjust_difficulty(&last, 1000.5), 1.3 * 10.0);
        // exactly MINE_RATE still counts as fast
        assert_eq!(adjust_difficulty(&last, 1000.0 + MINE_RATE), 1.3 * 10.0);
    }

    #[test]
    fn mined_block_satisfies_its_own_target() {
        let genesis = Block::genesis();
        let txs = vec![make_create_account("A")];
        let block = mine_block(&genesis, "miner", txs.clone(), "root");

        assert!(meets_target(&block.header));
        assert_eq!(block.header.number, 1);
        assert_eq!(block.header.parent_hash, genesis.hash());
        assert_eq!(block.header.transactions_hash, hash_transactions(&txs));
        assert_eq!(block.header.state_hash, "root");
        assert_eq!(block.transactions, txs);
    }

    #[test]
    fn consecutive_fast_blocks_get_harder() {
        let genesis = Block::genesis();
        let first = mine_block_at(&genesis, "m", vec![], "r", 10.0);
        assert_eq!(first.header.difficulty, 0.7 * 100.0);
        let second = mine_block_at(&first, "m", vec![], "r", 10.5);
        assert_eq!(second.header.difficulty, 1.3 * first.header.difficulty);
        assert!(meets_target(&second.header));
    }

    #[test]
    fn last_possible_number_does_not_overflow() {
        let mut last = Block::genesis();
        last.header.number = u64::MAX;
        let block = mine_block_at(&last, "m", vec![], "r", 10.0);
        assert_eq!(block.header.number, u64::MAX);
    }

    #[test]
    fn target_edges() {
        assert_eq!(target_for(1.0), max_hash_value());
        assert_eq!(target_for(0.0), BigUint::zero());
        assert_eq!(target_for(f64::MIN_POSITIVE), max_hash_value());
        assert!(target_for(100.0) < max_hash_value());
    }
}
