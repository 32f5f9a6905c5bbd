//! Transfer inspector - prints a vault transfer record with derived diagnostics.
//!
//! Usage:
//!   cargo run --release --bin transfer-inspect -- --transfer-id 2
//!   cargo run --release --bin transfer-inspect -- --rpc-url <URL> --vault <ADDRESS> --json

use anyhow::{Context, Result};
use clap::Parser;
use reverso_client::{
    config::{arg_or_env, parse_address, VaultTarget, DEFAULT_EXPECTED_RECEIVER},
    now_secs, Inspector, Vault,
};
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect a Reverso vault transfer for debugging")]
struct Args {
    /// EVM JSON-RPC endpoint URL (env: VAULT_RPC_URL)
    #[arg(long)]
    rpc_url: Option<String>,

    /// Vault contract address (env: VAULT_ADDRESS)
    #[arg(long)]
    vault: Option<String>,

    /// Transfer id to inspect (env: VAULT_TRANSFER_ID)
    #[arg(long)]
    transfer_id: Option<u64>,

    /// Address the recipient is compared against (env: VAULT_EXPECTED_RECEIVER)
    #[arg(long)]
    expected_receiver: Option<String>,

    /// Print the inspection as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(io::stderr)
        .init();

    let target = VaultTarget::resolve(args.rpc_url, args.vault, args.transfer_id)?;
    let expected_receiver = arg_or_env(
        args.expected_receiver,
        "VAULT_EXPECTED_RECEIVER",
        DEFAULT_EXPECTED_RECEIVER,
    );
    let expected_receiver = parse_address(&expected_receiver, "expected receiver")?;

    let vault = Vault::connect(&target.rpc_url, target.vault).context("Invalid RPC URL")?;
    let inspector = Inspector::new(vault, expected_receiver);
    let inspection = inspector
        .inspect(target.transfer_id, now_secs())
        .await
        .with_context(|| format!("Failed to inspect transfer {}", target.transfer_id))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        inspection.render_json(&mut out)?;
    } else {
        inspection.render(&mut out)?;
    }
    out.flush()?;
    Ok(())
}
