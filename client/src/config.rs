//! Settings resolution: CLI flag, then environment, then the built-in default.

use crate::{Error, Result};
use ethers::{
    signers::{LocalWallet, Signer},
    types::{Address, U256},
};
use std::{env, fs, str::FromStr, time::Duration};
use tracing::warn;

pub const DEFAULT_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";
pub const DEFAULT_VAULT_ADDRESS: &str = "0x3D1f9d1cEaf350885A91f7Fb05c99a78Bc544ED8";
pub const DEFAULT_EXPECTED_RECEIVER: &str = "0xb9279e38f6eab17f986E7133C60a46DE527628e3";
pub const DEFAULT_EXPLORER_URL: &str = "https://sepolia.etherscan.io";
pub const DEFAULT_TRANSFER_ID: u64 = 2;
/// Sepolia.
pub const DEFAULT_CHAIN_ID: u64 = 11_155_111;
pub const DEFAULT_GAS_LIMIT: u64 = 500_000;
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn read_secret_file(path: &str) -> Result<String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| Error::Config(format!("failed to read secret file {path}: {err}")))?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return Err(Error::Config(format!("secret file is empty: {path}")));
    }
    Ok(trimmed.to_string())
}

pub fn arg_or_env(value: Option<String>, env_key: &str, default: &str) -> String {
    value
        .or_else(|| env::var(env_key).ok())
        .unwrap_or_else(|| default.to_string())
}

pub fn require_arg_or_env_or_file(
    value: Option<String>,
    file: Option<String>,
    env_key: &str,
    env_file: &str,
) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    if let Some(file_path) = file {
        return read_secret_file(&file_path);
    }
    if let Ok(value) = env::var(env_key) {
        return Ok(value);
    }
    if let Ok(file_path) = env::var(env_file) {
        return read_secret_file(&file_path);
    }
    Err(Error::Config(format!(
        "missing {env_key} or {env_file} (flag or env var)"
    )))
}

/// A set but unparseable value is logged and treated as unset.
pub fn env_u64(key: &str) -> Option<u64> {
    let value = env::var(key).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(key, value = %value, %err, "Ignoring unparseable env value");
            None
        }
    }
}

/// Flag value, then a parseable env var, then the default.
pub fn u64_arg_or_env(value: Option<u64>, env_key: &str, default: u64) -> u64 {
    value.or_else(|| env_u64(env_key)).unwrap_or(default)
}

pub fn parse_address(value: &str, what: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|_| Error::Config(format!("invalid {what} address: {value}")))
}

/// Parse a hex private key (with or without `0x`) bound to `chain_id`.
pub fn parse_wallet(private_key: &str, chain_id: u64) -> Result<LocalWallet> {
    let wallet: LocalWallet = private_key
        .trim()
        .trim_start_matches("0x")
        .parse()
        // The key itself never goes into the message.
        .map_err(|_| Error::Config("invalid private key".to_string()))?;
    Ok(wallet.with_chain_id(chain_id))
}

/// Settings shared by both tools.
#[derive(Clone, Debug)]
pub struct VaultTarget {
    pub rpc_url: String,
    pub vault: Address,
    pub transfer_id: U256,
}

impl VaultTarget {
    pub fn resolve(
        rpc_url: Option<String>,
        vault: Option<String>,
        transfer_id: Option<u64>,
    ) -> Result<Self> {
        let rpc_url = arg_or_env(rpc_url, "VAULT_RPC_URL", DEFAULT_RPC_URL);
        let vault = arg_or_env(vault, "VAULT_ADDRESS", DEFAULT_VAULT_ADDRESS);
        let transfer_id = u64_arg_or_env(transfer_id, "VAULT_TRANSFER_ID", DEFAULT_TRANSFER_ID);
        Ok(Self {
            rpc_url,
            vault: parse_address(&vault, "vault")?,
            transfer_id: U256::from(transfer_id),
        })
    }
}
