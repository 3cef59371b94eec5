use actix_web::{HttpResponse, Responder, get, web};

use super::models::AppState;

#[get("/balance/{public_key}")]
pub async fn get_balance(state: web::Data<AppState>, path: web::Path<(String,)>) -> impl Responder {
    let public_key = path.into_inner().0;

    let node = state.node.lock().expect("mutex poisoned");
    match node.blockchain.state.get(&public_key) {
        Some(info) => HttpResponse::Ok().json(info),
        None => HttpResponse::NotFound().body("no such account"),
    }
}
