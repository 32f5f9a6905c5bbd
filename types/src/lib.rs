//! Common types used by the Reverso vault tools.

pub mod revert;
pub mod transfer;
pub mod units;

pub use revert::VaultRevert;
pub use transfer::{RawTransfer, TransferRecord, TransferStatus, Window};
pub use units::{format_ether, scale_gas_price};

use thiserror::Error;

/// Errors raised while decoding vault data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid transfer status code: {0}")]
    InvalidStatus(u8),
    #[error("{field} does not fit in u64")]
    TimestampOverflow { field: &'static str },
}
