//! URL Analysis
//!
//! Pipeline per URL:
//! 1. Parse (unparseable input is reported SAFE, see below)
//! 2. Normalize hostname (lower-case, strip leading `www.`)
//! 3. Domain reputation, typosquatting, URL patterns, in that order
//!
//! `safe` only turns false for PHISHING or TYPOSQUATTING. Pattern hits are
//! MEDIUM and raise `risk_level` without flipping `safe`, so a result can
//! read `MEDIUM` and `safe: true` at the same time. Callers rely on this.

use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::core::aggregator::derive_level;
use crate::core::domain::check_domain;
use crate::core::store::{normalize_domain, ThreatIntelStore};
use crate::core::typosquat::check_typosquatting;
use crate::core::url_rules::check_url_patterns;
use crate::models::types::{AnalysisResult, ThreatType};

pub struct UrlAnalyzer {
    store: Arc<ThreatIntelStore>,
}

impl UrlAnalyzer {
    pub fn new(store: Arc<ThreatIntelStore>) -> Self {
        Self { store }
    }

    /// Analyze a URL.
    ///
    /// Fail-open: a URL that cannot be parsed yields the default SAFE result
    /// rather than an error. This is a deliberate policy of the engine.
    pub fn analyze(&self, url: &str) -> AnalysisResult {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Unparseable URL treated as safe ({}): {:?}", e, url);
                return AnalysisResult::safe();
            }
        };

        let hostname = normalize_domain(parsed.host_str().unwrap_or_default());

        let mut threats = Vec::new();
        threats.extend(check_domain(&self.store.phishing_domains, &hostname));
        threats.extend(check_typosquatting(&hostname, &self.store.legitimate_sites));
        threats.extend(check_url_patterns(url));

        let safe = !threats.iter().any(|t| {
            matches!(t.threat_type, ThreatType::Phishing | ThreatType::Typosquatting)
        });
        let risk_level = derive_level(&threats);

        debug!(
            host = %hostname,
            findings = threats.len(),
            risk = risk_level.as_str(),
            "URL analyzed"
        );

        AnalysisResult {
            safe,
            threats,
            risk_level,
        }
    }
}
