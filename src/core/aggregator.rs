//! Risk Aggregator
//! Folds a set of findings into a single verdict

use crate::models::types::{RiskLevel, Severity, ThreatFinding};

/// Highest severity present, or `Safe` for no findings.
///
/// Monotonic: adding a finding can never lower the result.
pub fn derive_level(findings: &[ThreatFinding]) -> RiskLevel {
    findings
        .iter()
        .map(|f| RiskLevel::from(f.severity))
        .fold(RiskLevel::Safe, RiskLevel::max)
}

/// True when any finding is HIGH or CRITICAL
pub fn has_blocking_severity(findings: &[ThreatFinding]) -> bool {
    findings.iter().any(|f| f.severity >= Severity::High)
}
