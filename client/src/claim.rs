//! Claim execution: simulate, then always broadcast, then wait for the receipt.
//!
//! Simulation and submission failures are reported and never abort the run.
//! The explorer link at the end needs a transaction hash; when submission
//! failed before one was obtained the run ends with
//! [`Error::MissingTransactionHash`] instead of printing a link.

use crate::{Error, Result, Vault};
use ethers::{
    signers::{LocalWallet, Signer},
    types::{
        transaction::eip2718::TypedTransaction, Address, TransactionRequest, H256, U256, U64,
    },
    utils::to_checksum,
};
use reverso_types::{format_ether, scale_gas_price};
use std::{io::Write, time::Duration};
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct ClaimSettings {
    pub transfer_id: U256,
    pub chain_id: u64,
    pub gas_limit: U256,
    pub explorer_url: String,
    pub receipt_poll_interval: Duration,
    pub receipt_timeout: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Simulation {
    Succeeded,
    Failed(String),
}

/// What happened to the broadcast claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    Confirmed { gas_used: U256 },
    Reverted { gas_used: U256 },
    /// Submission or receipt wait failed.
    Errored(String),
}

#[derive(Clone, Debug)]
pub struct ClaimReport {
    pub account: Address,
    pub simulation: Simulation,
    pub outcome: ClaimOutcome,
    pub tx_hash: H256,
    pub explorer_link: String,
}

pub struct ClaimExecutor {
    vault: Vault,
    wallet: LocalWallet,
    settings: ClaimSettings,
}

impl ClaimExecutor {
    pub fn new(vault: Vault, wallet: LocalWallet, settings: ClaimSettings) -> Self {
        Self {
            vault,
            wallet,
            settings,
        }
    }

    pub fn account(&self) -> Address {
        self.wallet.address()
    }

    pub fn explorer_link(&self, tx_hash: H256) -> String {
        format!(
            "{}/tx/{:#x}",
            self.settings.explorer_url.trim_end_matches('/'),
            tx_hash
        )
    }

    pub async fn run<W: Write>(&self, out: &mut W) -> Result<ClaimReport> {
        let account = self.account();
        writeln!(out, "Receiver: {}", to_checksum(&account, None))?;
        let balance = self.vault.balance_of(account).await?;
        writeln!(out, "Balance: {} ETH", format_ether(balance))?;

        writeln!(out, "\nSimulating claim...")?;
        let simulation = match self
            .vault
            .simulate_claim(self.settings.transfer_id, account)
            .await
        {
            Ok(()) => {
                writeln!(out, "Simulation succeeded: ()")?;
                Simulation::Succeeded
            }
            Err(err) => {
                warn!(%err, "Claim simulation failed");
                writeln!(out, "Simulation failed: {err}")?;
                Simulation::Failed(err.to_string())
            }
        };

        writeln!(out, "\nTrying actual transaction with more gas...")?;
        let mut tx_hash = None;
        let outcome = match self.submit(out, &mut tx_hash).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(%err, "Claim transaction failed");
                writeln!(out, "Error: {err}")?;
                ClaimOutcome::Errored(err.to_string())
            }
        };

        let tx_hash = tx_hash.ok_or(Error::MissingTransactionHash)?;
        let explorer_link = self.explorer_link(tx_hash);
        writeln!(out, "\n🔗 {explorer_link}")?;

        Ok(ClaimReport {
            account,
            simulation,
            outcome,
            tx_hash,
            explorer_link,
        })
    }

    /// Build, sign and broadcast the claim, then wait for it to be mined.
    ///
    /// `tx_hash` is filled as soon as the node accepts the transaction so the
    /// caller can still link it if the receipt wait fails.
    async fn submit<W: Write>(&self, out: &mut W, tx_hash: &mut Option<H256>) -> Result<ClaimOutcome> {
        let account = self.account();
        let gas_price = scale_gas_price(self.vault.gas_price().await?);
        let nonce = self.vault.pending_nonce(account).await?;
        let request = TransactionRequest::new()
            .from(account)
            .to(self.vault.address())
            .data(self.vault.claim_calldata(self.settings.transfer_id)?)
            .gas(self.settings.gas_limit)
            .gas_price(gas_price)
            .nonce(nonce)
            .chain_id(self.settings.chain_id);
        let tx = TypedTransaction::Legacy(request);

        let signature = self.wallet.sign_transaction(&tx).await?;
        let hash = self.vault.send_raw(tx.rlp_signed(&signature)).await?;
        *tx_hash = Some(hash);
        writeln!(out, "TX Hash: {hash:#x}")?;
        info!(
            tx_hash = %format!("{:#x}", hash),
            %nonce,
            %gas_price,
            "Claim transaction submitted"
        );

        let receipt = self
            .vault
            .wait_for_receipt(
                hash,
                self.settings.receipt_poll_interval,
                self.settings.receipt_timeout,
            )
            .await?;
        let gas_used = receipt.gas_used.unwrap_or_default();
        let outcome = if receipt.status == Some(U64::one()) {
            writeln!(out, "\n✅ CLAIM SUCCESSFUL!")?;
            ClaimOutcome::Confirmed { gas_used }
        } else {
            writeln!(out, "\n❌ CLAIM FAILED!")?;
            ClaimOutcome::Reverted { gas_used }
        };
        writeln!(out, "Gas used: {gas_used}")?;
        info!(?outcome, block = ?receipt.block_number, "Claim transaction mined");
        Ok(outcome)
    }
}
