use actix_web::{HttpResponse, Responder, get, web};

use super::models::AppState;

/// Full chain plus the account state derived from it.
#[get("/blockchain")]
pub async fn get_blockchain(state: web::Data<AppState>) -> impl Responder {
    let node = state.node.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(&node.blockchain)
}
