//! Type definitions for the threat analysis engine
//! Findings, severities, verdicts and the external token-security report

use serde::{Deserialize, Serialize};

/// Severity carried by a single finding.
///
/// Variants are declared in ascending order so the derived `Ord` is the
/// priority order used by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// Overall verdict for an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// No findings
    #[default]
    Safe,
    /// Suspicious patterns only
    Medium,
    /// Likely to lose funds
    High,
    /// Confirmed malicious or near-certain loss
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "✅",
            RiskLevel::Medium => "🟠",
            RiskLevel::High => "🔴",
            RiskLevel::Critical => "💀",
        }
    }
}

impl From<Severity> for RiskLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Medium => RiskLevel::Medium,
            Severity::High => RiskLevel::High,
            Severity::Critical => RiskLevel::Critical,
        }
    }
}

/// Threat taxonomy shared by every analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatType {
    Phishing,
    Typosquatting,
    SuspiciousUrl,
    MaliciousContract,
    Honeypot,
    Blacklisted,
    OwnershipRisk,
    HiddenOwner,
    Mintable,
    HighTax,
    FewHolders,
    InfiniteApproval,
    ScamSpender,
}

impl ThreatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreatType::Phishing => "PHISHING",
            ThreatType::Typosquatting => "TYPOSQUATTING",
            ThreatType::SuspiciousUrl => "SUSPICIOUS_URL",
            ThreatType::MaliciousContract => "MALICIOUS_CONTRACT",
            ThreatType::Honeypot => "HONEYPOT",
            ThreatType::Blacklisted => "BLACKLISTED",
            ThreatType::OwnershipRisk => "OWNERSHIP_RISK",
            ThreatType::HiddenOwner => "HIDDEN_OWNER",
            ThreatType::Mintable => "MINTABLE",
            ThreatType::HighTax => "HIGH_TAX",
            ThreatType::FewHolders => "FEW_HOLDERS",
            ThreatType::InfiniteApproval => "INFINITE_APPROVAL",
            ThreatType::ScamSpender => "SCAM_SPENDER",
        }
    }
}

/// A single detected threat signal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatFinding {
    #[serde(rename = "type")]
    pub threat_type: ThreatType,
    pub severity: Severity,
    pub message: String,
    pub detail: String,
}

impl ThreatFinding {
    pub fn new(
        threat_type: ThreatType,
        severity: Severity,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            threat_type,
            severity,
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn description(&self) -> String {
        format!("[{}] {}: {}", self.severity.as_str(), self.threat_type.as_str(), self.message)
    }
}

/// Result of analyzing a URL, contract or approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Whether the host should let the user proceed without a warning
    pub safe: bool,
    /// Findings in the order the analyzers produced them
    pub threats: Vec<ThreatFinding>,
    /// Verdict derived from the most severe finding
    pub risk_level: RiskLevel,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::safe()
    }
}

impl AnalysisResult {
    /// The empty verdict: no findings, safe
    pub fn safe() -> Self {
        Self {
            safe: true,
            threats: Vec::new(),
            risk_level: RiskLevel::Safe,
        }
    }

    pub fn has_threat(&self, threat_type: ThreatType) -> bool {
        self.threats.iter().any(|t| t.threat_type == threat_type)
    }

    /// Pretty print the analysis result
    pub fn summary(&self) -> String {
        let mut output = format!(
            "{} Risk: {} | Safe: {}\n",
            self.risk_level.emoji(),
            self.risk_level.as_str(),
            self.safe
        );

        for threat in &self.threats {
            output.push_str(&format!("   - {}\n", threat.description()));
        }

        output
    }
}

/// Token security snapshot returned by the external provider.
///
/// Every field is independently optional: `None` means the provider did not
/// say, which never triggers a rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSecurityReport {
    pub is_honeypot: Option<bool>,
    pub is_blacklisted: Option<bool>,
    pub can_take_back_ownership: Option<bool>,
    pub hidden_owner: Option<bool>,
    pub is_mintable: Option<bool>,
    /// Sell tax as a percentage
    pub sell_tax: Option<f64>,
    pub holder_count: Option<u64>,
}

/// Inbound analysis requests, as sent by the extension host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    AnalyzeUrl {
        url: String,
    },
    AnalyzeContract {
        address: String,
        chain_id: u64,
    },
    AnalyzeApproval {
        spender: String,
        amount: String,
        token_symbol: Option<String>,
    },
}
