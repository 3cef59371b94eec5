mod api;
mod blockchain;
mod config;
mod error;
mod hashing;
mod node;
mod peer;
mod pubsub;
mod state;
mod transaction;
mod updater;
mod wallet;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{error, info};

use api::AppState;
use config::Config;
use pubsub::MessageBus;
use wallet::Account;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::from_env();
    let miner_address = match (&config.miner_address, &config.miner_secret_key) {
        (Some(address), _) => address.clone(),
        (None, Some(sk_hex)) => Account::from_secret_hex(sk_hex)
            .map_err(|e| std::io::Error::other(format!("MINER_SECRET_KEY: {e}")))?
            .public_key()
            .to_string(),
        (None, None) => Account::new().public_key().to_string(),
    };

    // Subscribe before anything can publish; earlier messages would be lost.
    let bus = MessageBus::new(config.bus_capacity);
    let subscriber = bus.subscribe();
    let state = web::Data::new(AppState::new(miner_address, bus));

    if let Some(peer_url) = &config.peer_url {
        peer::bootstrap(&state.node, peer_url).await;
    }

    info!(
        "⛓️ Starting ledger node at http://{}:{} (miner {})",
        config.host, config.port, state.miner_address
    );

    let mut halted = state.halted.subscribe();
    let app_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    tokio::select! {
        result = server => result,
        result = updater::run(state, subscriber) => result.map_err(|e| {
            error!("ledger updater stopped: {}", e);
            std::io::Error::other(e.to_string())
        }),
        reason = halted.wait_for(Option::is_some) => {
            let reason = reason.ok().and_then(|r| r.clone()).unwrap_or_default();
            error!("ledger halted: {}", reason);
            Err(std::io::Error::other(reason))
        }
    }
}
