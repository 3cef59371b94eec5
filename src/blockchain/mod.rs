pub mod block;
pub mod miner;
pub mod model;

pub use block::Block;
pub use model::Blockchain;

/// Target seconds between blocks for difficulty retargeting.
pub const MINE_RATE: f64 = 1.0;

/// Credited to the beneficiary by a REWARD_MINER transaction.
pub const MINING_REWARD: f64 = 50.0;

/// Balance a CREATE_ACCOUNT sets (or resets) an account to.
pub const STARTING_BALANCE: f64 = 0.0;
