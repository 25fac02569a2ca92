//! Approval Risk Evaluator
//!
//! Flags unbounded ERC-20 allowances and approvals granted to known
//! wallet drainers. Purely local, no provider calls.

use alloy_primitives::U256;
use std::sync::Arc;
use tracing::debug;

use crate::core::store::{normalize_address, ThreatIntelStore};
use crate::models::types::{AnalysisResult, RiskLevel, Severity, ThreatFinding, ThreatType};
use crate::utils::constants::{INFINITE_APPROVAL_EXPONENT, INFINITE_APPROVAL_THRESHOLD, MAX_UINT256_DECIMAL};

/// Amount as the host sent it, classified by how it could be read
#[derive(Debug, Clone, Copy, PartialEq)]
enum ParsedAmount {
    /// Fits in 256 bits, compared exactly
    Exact(U256),
    /// Float notation or integers wider than 256 bits
    Approximate(f64),
    Unparseable,
}

fn parse_amount(amount: &str) -> ParsedAmount {
    let raw = amount.trim();
    if raw.is_empty() {
        return ParsedAmount::Unparseable;
    }

    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return match U256::from_str_radix(hex, 16) {
            Ok(value) => ParsedAmount::Exact(value),
            Err(_) => approximate_hex(hex),
        };
    }

    if let Ok(value) = U256::from_str_radix(raw, 10) {
        return ParsedAmount::Exact(value);
    }

    match raw.parse::<f64>() {
        Ok(value) if !value.is_nan() => ParsedAmount::Approximate(value),
        _ => ParsedAmount::Unparseable,
    }
}

/// Hex digits too wide for 256 bits, folded into an f64
fn approximate_hex(hex: &str) -> ParsedAmount {
    if hex.is_empty() {
        return ParsedAmount::Unparseable;
    }
    hex.chars()
        .try_fold(0f64, |acc, c| c.to_digit(16).map(|d| acc * 16.0 + d as f64))
        .map(ParsedAmount::Approximate)
        .unwrap_or(ParsedAmount::Unparseable)
}

/// `2^256 - 1` verbatim, or anything strictly above `1e30`
pub fn is_infinite_approval(amount: &str) -> bool {
    if amount.trim() == MAX_UINT256_DECIMAL {
        return true;
    }

    match parse_amount(amount) {
        ParsedAmount::Exact(value) => {
            value > U256::from(10u128.pow(INFINITE_APPROVAL_EXPONENT as u32))
        }
        ParsedAmount::Approximate(value) => value > INFINITE_APPROVAL_THRESHOLD,
        ParsedAmount::Unparseable => false,
    }
}

pub struct ApprovalAnalyzer {
    store: Arc<ThreatIntelStore>,
}

impl ApprovalAnalyzer {
    pub fn new(store: Arc<ThreatIntelStore>) -> Self {
        Self { store }
    }

    pub fn analyze(&self, spender: &str, amount: &str, token_symbol: Option<&str>) -> AnalysisResult {
        let mut result = AnalysisResult::safe();
        let symbol = token_symbol
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("token");

        if is_infinite_approval(amount) {
            result.safe = false;
            result.threats.push(ThreatFinding::new(
                ThreatType::InfiniteApproval,
                Severity::High,
                format!("INFINITE approval of {}", symbol),
                "You are granting this contract unlimited permission to spend your tokens. \
                 If it is ever compromised you could lose everything. Approve only the amount you need.",
            ));
            result.risk_level = RiskLevel::High;
        }

        let spender = normalize_address(spender);
        if self.store.is_scam_spender(&spender) {
            result.safe = false;
            result.threats.push(ThreatFinding::new(
                ThreatType::ScamSpender,
                Severity::Critical,
                "Spender is on the scam blacklist",
                "This address is known to drain wallets after receiving an approval.",
            ));
            result.risk_level = RiskLevel::Critical;
        }

        debug!(
            "Approval of {} to {}: {} findings",
            symbol,
            spender,
            result.threats.len()
        );
        result
    }
}
