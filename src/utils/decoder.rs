//! Transaction decoder module
//! Parses ERC-20 `approve` calldata so the approval rules can run on raw transactions

use alloy_primitives::U256;
use alloy_sol_types::{sol, SolCall};

use crate::utils::constants::APPROVE_SELECTOR;

// ERC-20 approve signature
sol! {
    function approve(address spender, uint256 amount) external returns (bool);
}

/// Decoded approve call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalCall {
    /// Lower-case 0x-prefixed hex, no checksum
    pub spender: String,
    pub amount: U256,
}

impl ApprovalCall {
    /// Amount as a decimal string, the form the approval rules take
    pub fn amount_decimal(&self) -> String {
        self.amount.to_string()
    }
}

/// Decoder for approval transactions
pub struct ApprovalDecoder;

impl ApprovalDecoder {
    /// Decode hex calldata, with or without `0x`.
    /// Returns None if it is not a well-formed approve call
    pub fn decode(calldata: &str) -> Option<ApprovalCall> {
        let raw = calldata.trim();
        let raw = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .unwrap_or(raw);
        let bytes = hex::decode(raw).ok()?;
        Self::decode_bytes(&bytes)
    }

    pub fn decode_bytes(data: &[u8]) -> Option<ApprovalCall> {
        if data.len() < 4 || data[..4] != APPROVE_SELECTOR {
            return None;
        }

        let decoded = approveCall::abi_decode(data, false).ok()?;
        Some(ApprovalCall {
            spender: format!("0x{}", hex::encode(decoded.spender.as_slice())),
            amount: decoded.amount,
        })
    }
}
