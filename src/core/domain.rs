//! Domain Reputation Checker
//! Exact-match lookup of a hostname against the phishing-domain set

use crate::core::store::ThreatDomainSet;
use crate::models::types::{Severity, ThreatFinding, ThreatType};

/// PHISHING / CRITICAL when the hostname is a known phishing domain.
/// `hostname` must already be normalized.
pub fn check_domain(phishing_domains: &ThreatDomainSet, hostname: &str) -> Option<ThreatFinding> {
    if !phishing_domains.contains_normalized(hostname) {
        return None;
    }

    Some(ThreatFinding::new(
        ThreatType::Phishing,
        Severity::Critical,
        format!("Confirmed phishing site: {}", hostname),
        "This domain is on the blacklist of known crypto scams.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::ThreatSet;

    #[test]
    fn test_blacklisted_domain() {
        let set = ThreatSet::domains(["metamask-io.com"]);
        let finding = check_domain(&set, "metamask-io.com").unwrap();
        assert_eq!(finding.threat_type, ThreatType::Phishing);
        assert_eq!(finding.severity, Severity::Critical);
        assert!(finding.message.contains("metamask-io.com"));
    }

    #[test]
    fn test_unknown_domain() {
        let set = ThreatSet::domains(["metamask-io.com"]);
        assert!(check_domain(&set, "metamask.io").is_none());
        assert!(check_domain(&set, "").is_none());
    }

    #[test]
    fn test_hostname_is_not_renormalized() {
        let set = ThreatSet::domains(["metamask-io.com"]);
        assert!(check_domain(&set, "www.metamask-io.com").is_none());
        assert!(set.contains("www.metamask-io.com"));
    }
}
