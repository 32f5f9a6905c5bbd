pub mod claim;
pub mod config;
pub mod inspect;
pub mod vault;

#[cfg(test)]
pub(crate) mod mock;

pub use claim::{ClaimExecutor, ClaimOutcome, ClaimReport, ClaimSettings, Simulation};
pub use inspect::{Inspection, Inspector};
pub use vault::Vault;

use ethers::{
    contract::ContractError,
    providers::{Http, Provider, ProviderError},
    signers::WalletError,
    types::H256,
};
use reverso_types::VaultRevert;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Error type for vault operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("contract error: {0}")]
    Contract(#[from] ContractError<Provider<Http>>),
    #[error("{0}")]
    Reverted(VaultRevert),
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid transfer record: {0}")]
    Record(#[from] reverso_types::Error),
    #[error("contract call produced no calldata")]
    MissingCalldata,
    #[error("no receipt for {hash:#x} after {waited:?}")]
    ReceiptTimeout { hash: H256, waited: Duration },
    #[error("claim transaction was never broadcast; no hash to link")]
    MissingTransactionHash,
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for vault operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Current unix time in seconds.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
