//! URL Pattern Rule Engine
//!
//! Content heuristics evaluated against the raw URL string. Rules are
//! independent: every matching rule produces its own SUSPICIOUS_URL finding.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::types::{Severity, ThreatFinding, ThreatType};

/// A single heuristic
pub struct UrlRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub message: &'static str,
}

fn rule(name: &'static str, pattern: &str, message: &'static str) -> UrlRule {
    UrlRule {
        name,
        // patterns are literals below; a typo is a programming error
        pattern: Regex::new(&format!("(?i){}", pattern)).expect("invalid URL rule pattern"),
        message,
    }
}

lazy_static! {
    /// Evaluation order is the order findings are reported in
    pub static ref URL_RULES: Vec<UrlRule> = vec![
        rule(
            "airdrop",
            r"airdrop",
            "URLs mentioning \"airdrop\" are frequently scams",
        ),
        rule(
            "claim_reward",
            r"claim.*reward",
            "\"Claim rewards\" pages are frequently fake",
        ),
        rule(
            "walletconnect_impersonation",
            r"wallet.*connect.*\.",
            "Possible WalletConnect phishing",
        ),
        rule(
            "free_crypto",
            r"free.*crypto",
            "\"Free crypto\" is almost always a scam",
        ),
        rule(
            "free_nft_mint",
            r"nft.*mint.*free",
            "Suspicious free mint",
        ),
    ];
}

/// Names of the rules the URL matches, in evaluation order
pub fn matching_rules(raw_url: &str) -> Vec<&'static str> {
    URL_RULES
        .iter()
        .filter(|r| r.pattern.is_match(raw_url))
        .map(|r| r.name)
        .collect()
}

/// One SUSPICIOUS_URL / MEDIUM finding per matching rule
pub fn check_url_patterns(raw_url: &str) -> Vec<ThreatFinding> {
    URL_RULES
        .iter()
        .filter(|r| r.pattern.is_match(raw_url))
        .map(|r| {
            ThreatFinding::new(
                ThreatType::SuspiciousUrl,
                Severity::Medium,
                r.message,
                "Suspicious pattern detected in the URL.",
            )
        })
        .collect()
}
