use std::env;

/// Runtime settings, read from the environment after `.env` is loaded.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of a running node to bootstrap the chain from.
    pub peer_url: Option<String>,
    /// Public key credited by this node's miner.
    pub miner_address: Option<String>,
    /// Hex secret key whose public key becomes the miner address.
    pub miner_secret_key: Option<String>,
    pub bus_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(3000),
            peer_url: non_empty_var("PEER_URL"),
            miner_address: non_empty_var("MINER_ADDRESS"),
            miner_secret_key: non_empty_var("MINER_SECRET_KEY"),
            bus_capacity: parse_var("BUS_CAPACITY").unwrap_or(1024),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
