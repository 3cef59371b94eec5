use thiserror::Error;

/// Failures while applying a committed block to the account state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    #[error("account not found: {0}")]
    AccountNotFound(String),
}

#[derive(Debug, Error)]
pub enum BusError {
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    #[error("malformed bus message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("message bus closed")]
    Closed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("invalid hex encoding")]
    InvalidHex,

    #[error("invalid key bytes")]
    InvalidKey,

    #[error("invalid DER signature")]
    InvalidSignature,
}

/// Errors that stop the background ledger updater.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("bus error: {0}")]
    Bus(#[from] BusError),
}

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("peer request failed: {0}")]
    Http(#[from] reqwest::Error),
}
