use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::models::{AppState, MempoolResponse, TransactResponse};
use crate::transaction::{Transaction, TxType};

/// Submit a transaction. CREATE_ACCOUNT is always taken, TRANSACT only with a
/// valid signature, REWARD_MINER never (only the miner issues those).
/// Accepted transactions go into the mempool and out on the bus.
#[post("/transact")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<Transaction>,
) -> impl Responder {
    let tx = body.into_inner();
    debug!(
        "POST /transact - received {} ({:?})",
        tx.uuid(),
        tx.txtype()
    );

    let accepted = match tx.txtype() {
        TxType::CreateAccount => true,
        TxType::Transact => tx.check_signature(),
        TxType::RewardMiner => false,
    };
    if !accepted {
        warn!("POST /transact - rejected {} ({:?})", tx.uuid(), tx.txtype());
        return HttpResponse::Ok().json(TransactResponse { accepted: false });
    }

    {
        let mut node = state.node.lock().expect("mutex poisoned");
        node.add_transaction(tx.clone());
    }
    if let Err(e) = state.bus.publish_transaction(&tx) {
        warn!("POST /transact - could not broadcast {}: {}", tx.uuid(), e);
    }

    info!("POST /transact - accepted {}", tx.uuid());
    HttpResponse::Ok().json(TransactResponse { accepted: true })
}

/// List current mempool (just uuids to keep it compact).
#[get("/mempool")]
pub async fn get_mempool(state: web::Data<AppState>) -> impl Responder {
    let node = state.node.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(MempoolResponse {
        size: node.mempool.len(),
        transactions: node.mempool.uuids().map(str::to_string).collect(),
    })
}
