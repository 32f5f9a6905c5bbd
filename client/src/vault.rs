//! Bindings for the on-chain vault and the raw RPC calls the tools need.

use crate::{Error, Result};
use ethers::prelude::*;
use reverso_types::{TransferRecord, VaultRevert};
use std::{sync::Arc, time::Duration};
use tokio::time::{sleep, Instant};
use tracing::debug;

abigen!(
    ReversoVault,
    r#"[
        function transfers(uint256) external view returns (address sender, address recipient, address token, uint256 amount, uint256 createdAt, uint256 unlockAt, uint256 expiresAt, address recoveryAddress1, address recoveryAddress2, string memo, uint8 status, bool hasInsurance)
        function canClaim(uint256 transferId) external view returns (bool)
        function claim(uint256 transferId) external
    ]"#
);

/// Read/write handle on a deployed vault.
pub struct Vault {
    provider: Provider<Http>,
    contract: ReversoVault<Provider<Http>>,
}

impl Vault {
    pub fn connect(rpc_url: &str, address: Address) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)?;
        Ok(Self::new(provider, address))
    }

    pub fn new(provider: Provider<Http>, address: Address) -> Self {
        let contract = ReversoVault::new(address, Arc::new(provider.clone()));
        Self { provider, contract }
    }

    pub fn address(&self) -> Address {
        self.contract.address()
    }

    pub async fn transfer(&self, transfer_id: U256) -> Result<TransferRecord> {
        let raw = self.contract.transfers(transfer_id).call().await?;
        Ok(TransferRecord::try_from(raw)?)
    }

    pub async fn can_claim(&self, transfer_id: U256) -> Result<bool> {
        Ok(self.contract.can_claim(transfer_id).call().await?)
    }

    /// Native balance held by the vault contract.
    pub async fn balance(&self) -> Result<U256> {
        self.balance_of(self.address()).await
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256> {
        Ok(self.provider.get_balance(account, None).await?)
    }

    /// Run `claim` as an `eth_call` from `from`; a revert surfaces as [`Error::Reverted`].
    pub async fn simulate_claim(&self, transfer_id: U256, from: Address) -> Result<()> {
        match self.contract.claim(transfer_id).from(from).call().await {
            Ok(()) => Ok(()),
            Err(err) => match err.as_revert() {
                Some(data) => Err(Error::Reverted(VaultRevert::decode(data))),
                None => Err(Error::Contract(err)),
            },
        }
    }

    pub fn claim_calldata(&self, transfer_id: U256) -> Result<Bytes> {
        self.contract
            .claim(transfer_id)
            .calldata()
            .ok_or(Error::MissingCalldata)
    }

    pub async fn gas_price(&self) -> Result<U256> {
        Ok(self.provider.get_gas_price().await?)
    }

    /// Next nonce for `account`, counting transactions still in the mempool.
    pub async fn pending_nonce(&self, account: Address) -> Result<U256> {
        Ok(self
            .provider
            .get_transaction_count(account, Some(BlockNumber::Pending.into()))
            .await?)
    }

    pub async fn send_raw(&self, raw: Bytes) -> Result<H256> {
        let pending = self.provider.send_raw_transaction(raw).await?;
        Ok(pending.tx_hash())
    }

    /// Poll for a receipt until it appears or `timeout` elapses.
    pub async fn wait_for_receipt(
        &self,
        tx_hash: H256,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<TransactionReceipt> {
        let start = Instant::now();
        loop {
            if let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? {
                return Ok(receipt);
            }
            let waited = start.elapsed();
            if waited >= timeout {
                return Err(Error::ReceiptTimeout {
                    hash: tx_hash,
                    waited,
                });
            }
            debug!(tx_hash = %format!("{:#x}", tx_hash), ?waited, "Receipt not yet available");
            sleep(poll_interval).await;
        }
    }
}
