use log::{info, warn};
use serde::Deserialize;

use crate::blockchain::Block;
use crate::error::PeerError;
use crate::node::Node;

/// The part of a peer's `GET /blockchain` response needed to sync.
#[derive(Debug, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
}

pub async fn fetch_chain(peer_url: &str) -> Result<Vec<Block>, PeerError> {
    let url = format!("{}/api/v1/blockchain", peer_url.trim_end_matches('/'));
    let snapshot: ChainSnapshot = reqwest::get(url.as_str())
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(snapshot.chain)
}

/// Replace the local chain with the peer's. Returns whether it was adopted;
/// any failure leaves the node on its current chain.
pub async fn bootstrap(node: &std::sync::Mutex<Node>, peer_url: &str) -> bool {
    let chain = match fetch_chain(peer_url).await {
        Ok(chain) => chain,
        Err(e) => {
            warn!("PEER - could not fetch chain from {}: {}", peer_url, e);
            return false;
        }
    };
    let mut node = node.lock().expect("mutex poisoned");
    let adopted = node.blockchain.replace_chain(chain);
    if adopted {
        info!(
            "PEER - adopted chain of {} blocks from {}",
            node.blockchain.len(),
            peer_url
        );
    } else {
        warn!("PEER - chain from {} failed validation", peer_url);
    }
    adopted
}
