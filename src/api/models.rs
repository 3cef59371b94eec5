use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::watch;

use crate::node::Node;
use crate::pubsub::MessageBus;

/// Shared application state: the node behind its single lock, the bus the
/// API publishes on, and the key this node mines for.
///
/// `halted` carries the reason once chain and state have diverged; `main`
/// watches it and shuts the process down.
pub struct AppState {
    pub node: Mutex<Node>,
    pub bus: MessageBus,
    pub miner_address: String,
    pub halted: watch::Sender<Option<String>>,
}

impl AppState {
    pub fn new(miner_address: String, bus: MessageBus) -> Self {
        let (halted, _) = watch::channel(None);
        Self {
            node: Mutex::new(Node::new()),
            bus,
            miner_address,
            halted,
        }
    }

    pub fn halt(&self, reason: String) {
        self.halted.send_replace(Some(reason));
    }

    pub fn halt_reason(&self) -> Option<String> {
        self.halted.borrow().clone()
    }
}

/* ---------- Miner API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct MinerAddressResponse {
    pub address: String,
}

/* ---------- TX API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct TransactResponse {
    pub accepted: bool,
}

#[derive(Serialize, Deserialize)]
pub struct MempoolResponse {
    pub size: usize,
    pub transactions: Vec<String>, // uuids only
}

/* ---------- Wallet API Models ---------- */

#[derive(Serialize, Deserialize)]
pub struct NewWalletResponse {
    pub private_key: String,
    pub public_key: String,
}
