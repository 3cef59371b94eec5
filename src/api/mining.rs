use actix_web::{HttpResponse, Responder, get, post, web};
use log::{error, info, warn};

use super::models::{AppState, MinerAddressResponse};
use crate::blockchain::Block;
use crate::blockchain::miner::mine_block;

#[get("/miner/address")]
pub async fn get_miner_address(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(MinerAddressResponse {
        address: state.miner_address.clone(),
    })
}

/// Mine one block from the current tip and mempool:
/// - Snapshot tip, pending txs and state root under the lock
/// - Search for a nonce on the blocking pool, lock released
/// - Commit the block (rejected if the tip moved meanwhile)
/// - Broadcast it on the bus
#[post("/miner/mine")]
pub async fn mine(state: web::Data<AppState>) -> impl Responder {
    if let Some(reason) = state.halt_reason() {
        return HttpResponse::ServiceUnavailable().body(format!("ledger halted: {reason}"));
    }
    let beneficiary = state.miner_address.clone();
    let inputs = {
        let node = state.node.lock().expect("mutex poisoned");
        node.mining_inputs(&beneficiary)
    };
    let tx_count = inputs.transactions.len();

    let mined = web::block(move || {
        mine_block(
            &inputs.last_block,
            &beneficiary,
            inputs.transactions,
            &inputs.state_hash,
        )
    })
    .await;
    let block = match mined {
        Ok(block) => block,
        Err(e) => {
            error!("MINER - proof-of-work task failed: {}", e);
            return HttpResponse::InternalServerError().body("mining task failed");
        }
    };

    commit_mined(&state, block, tx_count)
}

/// Commit a freshly mined block and broadcast it. A block that appends but
/// does not apply leaves chain and state diverged, so the node is halted.
fn commit_mined(state: &AppState, block: Block, tx_count: usize) -> HttpResponse {
    let committed = {
        let mut node = state.node.lock().expect("mutex poisoned");
        node.accept_block(block.clone())
    };
    match committed {
        Ok(true) => {}
        Ok(false) => {
            warn!(
                "MINER - block #{} discarded: tip moved while mining",
                block.header.number
            );
            return HttpResponse::Conflict().body("chain tip moved while mining; block discarded");
        }
        Err(e) => {
            error!(
                "MINER - block #{} appended but state not applied, halting: {}",
                block.header.number, e
            );
            state.halt(format!("block #{}: {}", block.header.number, e));
            return HttpResponse::InternalServerError().body(e.to_string());
        }
    }

    if let Err(e) = state.bus.publish_block(&block) {
        warn!("MINER - could not broadcast block #{}: {}", block.header.number, e);
    }
    info!(
        "MINER - sealed block #{} (hash={}, nonce={}, difficulty={:.3}, txs={})",
        block.header.number,
        block.hash(),
        block.header.nonce,
        block.header.difficulty,
        tx_count
    );
    HttpResponse::Ok().json(&block)
}
