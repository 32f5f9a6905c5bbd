//! Transfer inspection: fetch one record and report it with derived diagnostics.

use crate::{Result, Vault};
use ethers::{
    types::{Address, U256},
    utils::to_checksum,
};
use reverso_types::{format_ether, TransferRecord, Window};
use serde::Serialize;
use std::io::Write;
use tracing::{info, warn};

/// Snapshot of a transfer plus everything derived from it at `now`.
#[derive(Debug, Serialize)]
pub struct Inspection {
    pub transfer_id: U256,
    pub record: TransferRecord,
    pub amount_eth: String,
    pub native_token: bool,
    /// Recovery addresses that are set, in slot order.
    pub recovery_addresses: Vec<Address>,
    pub now: u64,
    pub unlock_delta: i128,
    pub expected_receiver: Address,
    pub receiver_matches: bool,
    pub window: Window,
    /// `None` when the vault does not answer `canClaim`.
    pub can_claim: Option<bool>,
    pub vault_balance: U256,
    pub vault_balance_eth: String,
}

pub struct Inspector {
    vault: Vault,
    expected_receiver: Address,
}

impl Inspector {
    pub fn new(vault: Vault, expected_receiver: Address) -> Self {
        Self {
            vault,
            expected_receiver,
        }
    }

    pub async fn inspect(&self, transfer_id: U256, now: u64) -> Result<Inspection> {
        info!(%transfer_id, vault = ?self.vault.address(), "Fetching transfer");
        let record = self.vault.transfer(transfer_id).await?;

        let can_claim = match self.vault.can_claim(transfer_id).await {
            Ok(answer) => Some(answer),
            Err(err) => {
                warn!(%err, "canClaim unavailable");
                None
            }
        };
        let vault_balance = self.vault.balance().await?;

        Ok(Inspection {
            transfer_id,
            amount_eth: format_ether(record.amount),
            native_token: record.is_native(),
            recovery_addresses: record.recovery_addresses().copied().collect(),
            now,
            unlock_delta: record.unlock_delta(now),
            expected_receiver: self.expected_receiver,
            receiver_matches: record.recipient_matches(&self.expected_receiver),
            window: record.window(now),
            can_claim,
            vault_balance,
            vault_balance_eth: format_ether(vault_balance),
            record,
        })
    }
}

impl Inspection {
    pub fn render<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let record = &self.record;
        writeln!(out, "=== Transfer #{} Debug ===", self.transfer_id)?;
        writeln!(out, "Sender: {}", to_checksum(&record.sender, None))?;
        writeln!(out, "Recipient: {}", to_checksum(&record.recipient, None))?;
        writeln!(out, "Token: {}", to_checksum(&record.token, None))?;
        writeln!(out, "Amount: {} ETH", self.amount_eth)?;
        writeln!(out, "Created At: {}", record.created_at)?;
        writeln!(out, "Unlock At: {}", record.unlock_at)?;
        writeln!(out, "Expires At: {}", record.expires_at)?;
        writeln!(out, "Recovery1: {}", to_checksum(&record.recovery_address_1, None))?;
        writeln!(out, "Recovery2: {}", to_checksum(&record.recovery_address_2, None))?;
        writeln!(out, "Memo: {}", record.memo)?;
        writeln!(
            out,
            "Status: {} ({})",
            record.status.code(),
            record.status.name()
        )?;
        writeln!(out, "Has Insurance: {}", record.has_insurance)?;
        writeln!(out)?;
        writeln!(out, "Current time: {}", self.now)?;
        writeln!(out, "Unlock diff: {} seconds", self.unlock_delta)?;
        writeln!(out, "Receiver matches: {}", self.receiver_matches)?;
        writeln!(out, "Window: {}", self.window)?;
        match self.can_claim {
            Some(answer) => writeln!(out, "Can claim: {answer}")?,
            None => writeln!(out, "Can claim: unknown")?,
        }
        writeln!(out)?;
        writeln!(out, "Vault balance: {} ETH", self.vault_balance_eth)
    }

    pub fn render_json<W: Write>(&self, out: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}
