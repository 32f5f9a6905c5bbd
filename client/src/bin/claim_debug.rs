//! Claim debugger - simulates and then submits a vault claim, reporting each step.
//!
//! Usage:
//!   CLAIM_PRIVATE_KEY=<HEX> cargo run --release --bin claim-debug -- --transfer-id 2
//!   cargo run --release --bin claim-debug -- --private-key-file <PATH> --gas-limit 500000

use anyhow::{Context, Result};
use clap::Parser;
use ethers::types::U256;
use reverso_client::{
    config::{
        arg_or_env, parse_wallet, require_arg_or_env_or_file, u64_arg_or_env, VaultTarget,
        DEFAULT_CHAIN_ID, DEFAULT_EXPLORER_URL, DEFAULT_GAS_LIMIT, DEFAULT_RECEIPT_TIMEOUT_SECS,
        RECEIPT_POLL_INTERVAL,
    },
    ClaimExecutor, ClaimSettings, Vault,
};
use std::{
    io::{self, Write},
    time::Duration,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulate and submit a Reverso vault claim")]
struct Args {
    /// EVM JSON-RPC endpoint URL (env: VAULT_RPC_URL)
    #[arg(long)]
    rpc_url: Option<String>,

    /// Vault contract address (env: VAULT_ADDRESS)
    #[arg(long)]
    vault: Option<String>,

    /// Transfer id to claim (env: VAULT_TRANSFER_ID)
    #[arg(long)]
    transfer_id: Option<u64>,

    /// Recipient private key hex (env: CLAIM_PRIVATE_KEY)
    #[arg(long)]
    private_key: Option<String>,

    /// Path to file with the recipient private key hex (env: CLAIM_PRIVATE_KEY_FILE)
    #[arg(long)]
    private_key_file: Option<String>,

    /// EVM chain id (env: VAULT_CHAIN_ID)
    #[arg(long)]
    chain_id: Option<u64>,

    /// Gas limit for the claim transaction (env: CLAIM_GAS_LIMIT)
    #[arg(long)]
    gas_limit: Option<u64>,

    /// Block explorer base URL (env: VAULT_EXPLORER_URL)
    #[arg(long)]
    explorer_url: Option<String>,

    /// Seconds to wait for the claim receipt (env: CLAIM_RECEIPT_TIMEOUT_SECS)
    #[arg(long)]
    receipt_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(io::stderr)
        .init();

    let target = VaultTarget::resolve(args.rpc_url, args.vault, args.transfer_id)?;
    let chain_id = u64_arg_or_env(args.chain_id, "VAULT_CHAIN_ID", DEFAULT_CHAIN_ID);
    let private_key = require_arg_or_env_or_file(
        args.private_key,
        args.private_key_file,
        "CLAIM_PRIVATE_KEY",
        "CLAIM_PRIVATE_KEY_FILE",
    )?;
    let wallet = parse_wallet(&private_key, chain_id)?;

    let settings = ClaimSettings {
        transfer_id: target.transfer_id,
        chain_id,
        gas_limit: U256::from(u64_arg_or_env(
            args.gas_limit,
            "CLAIM_GAS_LIMIT",
            DEFAULT_GAS_LIMIT,
        )),
        explorer_url: arg_or_env(args.explorer_url, "VAULT_EXPLORER_URL", DEFAULT_EXPLORER_URL),
        receipt_poll_interval: RECEIPT_POLL_INTERVAL,
        receipt_timeout: Duration::from_secs(u64_arg_or_env(
            args.receipt_timeout_secs,
            "CLAIM_RECEIPT_TIMEOUT_SECS",
            DEFAULT_RECEIPT_TIMEOUT_SECS,
        )),
    };

    let vault = Vault::connect(&target.rpc_url, target.vault).context("Invalid RPC URL")?;
    info!(
        rpc_url = %target.rpc_url,
        vault = ?target.vault,
        transfer_id = %target.transfer_id,
        chain_id,
        "Claim debugger starting"
    );

    let executor = ClaimExecutor::new(vault, wallet, settings);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = executor.run(&mut out).await;
    out.flush()?;
    let report = result.context("Claim run did not complete")?;
    info!(tx_hash = %format!("{:#x}", report.tx_hash), outcome = ?report.outcome, "Claim debugger finished");
    Ok(())
}
