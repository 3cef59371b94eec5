pub mod mempool;
pub mod model;

pub use mempool::Mempool;
pub use model::{Transaction, TxType, make_create_account, make_reward_miner, make_send};
