//! Contract Risk Evaluator
//!
//! 1. Local blacklist: a known drainer short-circuits everything else
//! 2. Token security report from the external provider (cached)
//! 3. Threshold rules over the report
//!
//! Provider failures are logged and yield no findings; "queried and clean"
//! and "could not query" produce the same result. Unlike the URL path,
//! `safe` here is recomputed from the final severities.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::core::aggregator::{derive_level, has_blocking_severity};
use crate::core::store::{normalize_address, ThreatIntelStore};
use crate::models::config::ChainId;
use crate::models::types::{AnalysisResult, RiskLevel, Severity, ThreatFinding, ThreatType, TokenSecurityReport};
use crate::providers::goplus::TokenSecuritySource;
use crate::utils::cache::SecurityReportCache;
use crate::utils::constants::{
    CRITICAL_TAX_THRESHOLD_PERCENT, DEFAULT_EXTERNAL_TIMEOUT_SECS, HIGH_TAX_THRESHOLD_PERCENT,
    MIN_HOLDER_COUNT,
};

pub struct ContractAnalyzer {
    store: Arc<ThreatIntelStore>,
    source: Arc<dyn TokenSecuritySource>,
    cache: SecurityReportCache,
    timeout: Duration,
}

impl ContractAnalyzer {
    pub fn new(store: Arc<ThreatIntelStore>, source: Arc<dyn TokenSecuritySource>) -> Self {
        Self {
            store,
            source,
            cache: SecurityReportCache::new(),
            timeout: Duration::from_secs(DEFAULT_EXTERNAL_TIMEOUT_SECS),
        }
    }

    pub fn with_cache(mut self, cache: SecurityReportCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &SecurityReportCache {
        &self.cache
    }

    pub async fn analyze(&self, address: &str, chain_id: u64) -> AnalysisResult {
        let address = normalize_address(address);

        if self.store.is_malicious_contract(&address) {
            return AnalysisResult {
                safe: false,
                threats: vec![ThreatFinding::new(
                    ThreatType::MaliciousContract,
                    Severity::Critical,
                    "Confirmed malicious contract",
                    "This address is on the blacklist of wallet-draining contracts.",
                )],
                risk_level: RiskLevel::Critical,
            };
        }

        let chain = ChainId::fold(chain_id);
        let threats = match self.security_report(chain, &address).await {
            Some(report) => evaluate_report(&report),
            None => Vec::new(),
        };

        AnalysisResult {
            safe: !has_blocking_severity(&threats),
            risk_level: derive_level(&threats),
            threats,
        }
    }

    /// Cached report, or a fresh fetch bounded by the timeout.
    /// Any failure is swallowed and reads as "no report".
    async fn security_report(&self, chain: ChainId, address: &str) -> Option<TokenSecurityReport> {
        if let Some(cached) = self.cache.get(chain, address) {
            return cached;
        }

        match tokio::time::timeout(self.timeout, self.source.fetch_report(chain, address)).await {
            Ok(Ok(report)) => {
                self.cache.set(chain, address, report.clone());
                report
            }
            Ok(Err(e)) => {
                warn!(code = e.code_str(), "⚠️ Token security lookup failed for {}: {}", address, e);
                None
            }
            Err(_) => {
                warn!(
                    "⚠️ Token security lookup for {} timed out after {}s",
                    address,
                    self.timeout.as_secs()
                );
                None
            }
        }
    }
}

/// Translate a report into findings. Each rule is independent and only a
/// present field can trigger one.
pub fn evaluate_report(report: &TokenSecurityReport) -> Vec<ThreatFinding> {
    let mut threats = Vec::new();

    if report.is_honeypot == Some(true) {
        threats.push(ThreatFinding::new(
            ThreatType::Honeypot,
            Severity::Critical,
            "🍯 HONEYPOT DETECTED",
            "You can buy but you will NOT be able to sell. Confirmed trap.",
        ));
    }

    if report.is_blacklisted == Some(true) {
        threats.push(ThreatFinding::new(
            ThreatType::Blacklisted,
            Severity::Critical,
            "Contract is blacklisted",
            "This contract has been reported as malicious.",
        ));
    }

    if report.can_take_back_ownership == Some(true) {
        threats.push(ThreatFinding::new(
            ThreatType::OwnershipRisk,
            Severity::High,
            "Owner can take back control",
            "The creator can reclaim ownership and drain liquidity.",
        ));
    }

    if report.hidden_owner == Some(true) {
        threats.push(ThreatFinding::new(
            ThreatType::HiddenOwner,
            Severity::High,
            "Hidden owner detected",
            "A concealed owner may hold special powers over the contract.",
        ));
    }

    if report.is_mintable == Some(true) {
        threats.push(ThreatFinding::new(
            ThreatType::Mintable,
            Severity::Medium,
            "Mintable token (inflation possible)",
            "The creator can mint new tokens at any time, diluting your holdings.",
        ));
    }

    if let Some(tax) = report.sell_tax.filter(|t| *t > HIGH_TAX_THRESHOLD_PERCENT) {
        let critical = tax > CRITICAL_TAX_THRESHOLD_PERCENT;
        threats.push(ThreatFinding::new(
            ThreatType::HighTax,
            if critical { Severity::Critical } else { Severity::High },
            format!("High sell tax: {}%", tax),
            if critical {
                "Sell tax above 49% makes a profitable exit impossible. Possible honeypot."
            } else {
                "Very high sell tax. You may not be able to exit with a profit."
            },
        ));
    }

    if let Some(holders) = report.holder_count.filter(|n| *n < MIN_HOLDER_COUNT) {
        threats.push(ThreatFinding::new(
            ThreatType::FewHolders,
            Severity::Medium,
            format!("Few holders: {}", holders),
            "Supply is highly concentrated. The price is easy to manipulate.",
        ));
    }

    debug!("Report produced {} findings", threats.len());
    threats
}
