//! Transfer records held by the vault.
//!
//! A record is read through the contract's public `transfers(uint256)` getter,
//! which flattens the on-chain struct into twelve return values in this order:
//! sender, recipient, token, amount, createdAt, unlockAt, expiresAt,
//! recoveryAddress1, recoveryAddress2, memo, status, hasInsurance.

use crate::Error;
use ethers::types::{Address, U256};
use serde::Serialize;
use std::fmt;

/// Tuple returned by the `transfers(uint256)` getter.
pub type RawTransfer = (
    Address,
    Address,
    Address,
    U256,
    U256,
    U256,
    U256,
    Address,
    Address,
    String,
    u8,
    bool,
);

/// Lifecycle state of a transfer, by its on-chain enum position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum TransferStatus {
    Pending = 0,
    Completed = 1,
    Cancelled = 2,
    Expired = 3,
    Frozen = 4,
}

impl TransferStatus {
    pub const ALL: [TransferStatus; 5] = [
        TransferStatus::Pending,
        TransferStatus::Completed,
        TransferStatus::Cancelled,
        TransferStatus::Expired,
        TransferStatus::Frozen,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            TransferStatus::Pending => "Pending",
            TransferStatus::Completed => "Completed",
            TransferStatus::Cancelled => "Cancelled",
            TransferStatus::Expired => "Expired",
            TransferStatus::Frozen => "Frozen",
        }
    }
}

impl TryFrom<u8> for TransferStatus {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or(Error::InvalidStatus(code))
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a transfer sits relative to its unlock and expiry times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Window {
    Locked,
    Open,
    Expired,
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Window::Locked => "Locked",
            Window::Open => "Open",
            Window::Expired => "Expired",
        };
        f.write_str(name)
    }
}

/// Decoded snapshot of a single vault transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    pub sender: Address,
    pub recipient: Address,
    /// Zero for native ETH transfers.
    pub token: Address,
    /// Amount in the smallest denomination.
    pub amount: U256,
    pub created_at: u64,
    pub unlock_at: u64,
    pub expires_at: u64,
    pub recovery_address_1: Address,
    pub recovery_address_2: Address,
    pub memo: String,
    pub status: TransferStatus,
    pub has_insurance: bool,
}

impl TryFrom<RawTransfer> for TransferRecord {
    type Error = Error;

    fn try_from(raw: RawTransfer) -> Result<Self, Self::Error> {
        let (
            sender,
            recipient,
            token,
            amount,
            created_at,
            unlock_at,
            expires_at,
            recovery_address_1,
            recovery_address_2,
            memo,
            status,
            has_insurance,
        ) = raw;
        Ok(Self {
            sender,
            recipient,
            token,
            amount,
            created_at: timestamp(created_at, "createdAt")?,
            unlock_at: timestamp(unlock_at, "unlockAt")?,
            expires_at: timestamp(expires_at, "expiresAt")?,
            recovery_address_1,
            recovery_address_2,
            memo,
            status: TransferStatus::try_from(status)?,
            has_insurance,
        })
    }
}

fn timestamp(value: U256, field: &'static str) -> Result<u64, Error> {
    if value > U256::from(u64::MAX) {
        return Err(Error::TimestampOverflow { field });
    }
    Ok(value.as_u64())
}

impl TransferRecord {
    pub fn is_native(&self) -> bool {
        self.token.is_zero()
    }

    /// Seconds elapsed since unlock; negative while the transfer is still locked.
    pub fn unlock_delta(&self, now: u64) -> i128 {
        i128::from(now) - i128::from(self.unlock_at)
    }

    pub fn window(&self, now: u64) -> Window {
        if now < self.unlock_at {
            Window::Locked
        } else if self.expires_at != 0 && now >= self.expires_at {
            Window::Expired
        } else {
            Window::Open
        }
    }

    /// Address equality is byte equality, so hex casing never matters.
    pub fn recipient_matches(&self, expected: &Address) -> bool {
        self.recipient == *expected
    }

    /// Recovery addresses that are actually set.
    pub fn recovery_addresses(&self) -> impl Iterator<Item = &Address> {
        [&self.recovery_address_1, &self.recovery_address_2]
            .into_iter()
            .filter(|address| !address.is_zero())
    }
}
