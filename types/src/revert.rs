//! Revert payload decoding for vault calls.

use ethers::{
    abi::{self, ParamType, Token},
    types::U256,
    utils::{hex, id},
};
use std::fmt;

/// Selector of the standard `Error(string)` revert.
const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Selector of the compiler's `Panic(uint256)` revert.
const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Custom errors the vault (and the OpenZeppelin mixins it inherits) can raise.
pub const VAULT_ERRORS: &[&str] = &[
    "NotRecipient()",
    "NotSender()",
    "NotGuardian()",
    "NotAuthorized()",
    "TransferStillLocked()",
    "TransferNotPending()",
    "TransferAlreadyUnlocked()",
    "TransferNotExpired()",
    "InvalidRecipient()",
    "InvalidAmount()",
    "InvalidDelay()",
    "InvalidAddress()",
    "ActionIsCancelled()",
    "TimelockNotExpired()",
    "NeedsSecondConfirmation()",
    "CannotRemoveLastGuardian()",
    "EnforcedPause()",
    "ReentrancyGuardReentrantCall()",
    "OwnableUnauthorizedAccount(address)",
];

/// Reason a vault call reverted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VaultRevert {
    /// `require(..., "message")` or `revert("message")`.
    Message(String),
    Panic(U256),
    /// One of [`VAULT_ERRORS`].
    Custom(&'static str),
    Unknown([u8; 4]),
    /// Revert with no (or truncated) payload.
    Empty,
}

impl VaultRevert {
    pub fn decode(data: &[u8]) -> Self {
        if data.len() < 4 {
            return VaultRevert::Empty;
        }
        let (head, body) = data.split_at(4);
        let mut selector = [0u8; 4];
        selector.copy_from_slice(head);

        match selector {
            ERROR_SELECTOR => match abi::decode(&[ParamType::String], body).ok().as_deref() {
                Some([Token::String(message)]) => VaultRevert::Message(message.clone()),
                _ => VaultRevert::Unknown(selector),
            },
            PANIC_SELECTOR => match abi::decode(&[ParamType::Uint(256)], body).ok().as_deref() {
                Some([Token::Uint(code)]) => VaultRevert::Panic(*code),
                _ => VaultRevert::Unknown(selector),
            },
            _ => VAULT_ERRORS
                .iter()
                .find(|signature| id(signature) == selector)
                .map(|signature| VaultRevert::Custom(*signature))
                .unwrap_or(VaultRevert::Unknown(selector)),
        }
    }
}

impl fmt::Display for VaultRevert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VaultRevert::Message(message) => write!(f, "execution reverted: {message}"),
            VaultRevert::Panic(code) => write!(f, "panic code {code:#x}"),
            VaultRevert::Custom(signature) => write!(f, "execution reverted: {signature}"),
            VaultRevert::Unknown(selector) => {
                write!(f, "execution reverted: unknown selector 0x{}", hex::encode(selector))
            }
            VaultRevert::Empty => f.write_str("execution reverted"),
        }
    }
}
