//! Threat Intelligence Store
//!
//! Holds the reference collections every analyzer consults:
//! - phishing domains (grows through the feed synchronizer)
//! - malicious contract addresses
//! - scam spender addresses
//! - the fixed legitimate-site registry
//!
//! Sets are append-only. A batch merge happens under a single write lock so
//! readers observe either the old set or the fully merged one.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use crate::utils::constants::{
    LEGITIMATE_SITES, SEED_MALICIOUS_CONTRACTS, SEED_PHISHING_DOMAINS, SEED_SCAM_SPENDERS,
};

/// Lower-case, trim, and strip one leading `www.`
pub fn normalize_domain(domain: &str) -> String {
    let lower = domain.trim().to_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

/// Lower-case and trim
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// How entries of a set are normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetKind {
    Domain,
    Address,
}

impl SetKind {
    fn normalize(&self, value: &str) -> String {
        match self {
            SetKind::Domain => normalize_domain(value),
            SetKind::Address => normalize_address(value),
        }
    }
}

/// Case-insensitive, append-only set of normalized strings
#[derive(Debug)]
pub struct ThreatSet {
    kind: SetKind,
    entries: RwLock<HashSet<String>>,
}

/// Malicious-domain set
pub type ThreatDomainSet = ThreatSet;
/// Contract or spender address set
pub type ThreatAddressSet = ThreatSet;

impl ThreatSet {
    pub fn new(kind: SetKind) -> Self {
        Self {
            kind,
            entries: RwLock::new(HashSet::new()),
        }
    }

    pub fn domains<'a>(seed: impl IntoIterator<Item = &'a str>) -> Self {
        let set = Self::new(SetKind::Domain);
        set.merge(seed);
        set
    }

    pub fn addresses<'a>(seed: impl IntoIterator<Item = &'a str>) -> Self {
        let set = Self::new(SetKind::Address);
        set.merge(seed);
        set
    }

    /// Membership test; the candidate is normalized the same way as entries
    pub fn contains(&self, value: &str) -> bool {
        self.contains_normalized(&self.kind.normalize(value))
    }

    /// Membership test for a key the caller already normalized
    pub fn contains_normalized(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    /// Insert a single entry, returns true if it was new
    pub fn insert(&self, value: &str) -> bool {
        self.merge(std::iter::once(value)) == 1
    }

    /// Union a batch into the set. Returns how many entries were new.
    ///
    /// Normalization happens before the write lock is taken; the whole batch
    /// becomes visible at once.
    pub fn merge<I, S>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = values
            .into_iter()
            .map(|v| self.kind.normalize(v.as_ref()))
            .filter(|v| !v.is_empty())
            .collect();

        if normalized.is_empty() {
            return 0;
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        normalized
            .into_iter()
            .filter(|v| entries.insert(v.clone()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fixed, ordered list of legitimate reference domains
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegitimateSiteRegistry {
    sites: Vec<String>,
}

impl Default for LegitimateSiteRegistry {
    fn default() -> Self {
        Self::new(LEGITIMATE_SITES.iter().copied())
    }
}

impl LegitimateSiteRegistry {
    pub fn new<'a>(sites: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            sites: sites.into_iter().map(normalize_domain).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.sites.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// The in-memory reference collections consulted by the analyzers
#[derive(Debug)]
pub struct ThreatIntelStore {
    pub phishing_domains: ThreatDomainSet,
    pub malicious_contracts: ThreatAddressSet,
    pub scam_spenders: ThreatAddressSet,
    pub legitimate_sites: LegitimateSiteRegistry,
}

impl Default for ThreatIntelStore {
    fn default() -> Self {
        Self::with_seed_data()
    }
}

impl ThreatIntelStore {
    /// Store populated with the lists shipped in the binary
    pub fn with_seed_data() -> Self {
        Self {
            phishing_domains: ThreatSet::domains(SEED_PHISHING_DOMAINS.iter().copied()),
            malicious_contracts: ThreatSet::addresses(SEED_MALICIOUS_CONTRACTS.iter().copied()),
            scam_spenders: ThreatSet::addresses(SEED_SCAM_SPENDERS.iter().copied()),
            legitimate_sites: LegitimateSiteRegistry::default(),
        }
    }

    /// Empty blacklists with the default registry
    pub fn empty() -> Self {
        Self {
            phishing_domains: ThreatSet::new(SetKind::Domain),
            malicious_contracts: ThreatSet::new(SetKind::Address),
            scam_spenders: ThreatSet::new(SetKind::Address),
            legitimate_sites: LegitimateSiteRegistry::default(),
        }
    }

    pub fn with_legitimate_sites(mut self, registry: LegitimateSiteRegistry) -> Self {
        self.legitimate_sites = registry;
        self
    }

    pub fn is_phishing_domain(&self, hostname: &str) -> bool {
        self.phishing_domains.contains(hostname)
    }

    pub fn is_malicious_contract(&self, address: &str) -> bool {
        self.malicious_contracts.contains(address)
    }

    pub fn is_scam_spender(&self, address: &str) -> bool {
        self.scam_spenders.contains(address)
    }

    /// Union feed domains into the phishing set, returns how many were new
    pub fn merge_phishing_domains<I, S>(&self, domains: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.phishing_domains.merge(domains)
    }

    pub fn sizes(&self) -> StoreSizes {
        StoreSizes {
            phishing_domains: self.phishing_domains.len(),
            malicious_contracts: self.malicious_contracts.len(),
            scam_spenders: self.scam_spenders.len(),
            legitimate_sites: self.legitimate_sites.len(),
        }
    }
}

/// Entry counts for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct StoreSizes {
    pub phishing_domains: usize,
    pub malicious_contracts: usize,
    pub scam_spenders: usize,
    pub legitimate_sites: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_normalization() {
        assert_eq!(normalize_domain("WWW.MetaMask.IO"), "metamask.io");
        assert_eq!(normalize_domain("  uniswap.org "), "uniswap.org");
        // only the leading label is stripped
        assert_eq!(normalize_domain("app.www.example.com"), "app.www.example.com");
        assert_eq!(normalize_domain("www.www.example.com"), "www.example.com");
    }

    #[test]
    fn test_case_insensitive_membership() {
        let set = ThreatSet::domains(["Metamask-IO.com"]);
        assert!(set.contains("metamask-io.com"));
        assert!(set.contains("www.METAMASK-io.com"));
        assert!(!set.contains("metamask.io"));

        let addresses = ThreatSet::addresses(["0xABCDEF"]);
        assert!(addresses.contains("0xabcdef"));
    }

    #[test]
    fn test_merge_is_idempotent_union() {
        let set = ThreatSet::domains(["a.com"]);
        assert_eq!(set.merge(["b.com", "B.com", "www.a.com"]), 1);
        assert_eq!(set.len(), 2);
        assert_eq!(set.merge(["b.com", "a.com"]), 0);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_blank_entries_are_ignored() {
        let set = ThreatSet::new(SetKind::Domain);
        assert_eq!(set.merge(["", "   ", "www."]), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_seeded_store() {
        let store = ThreatIntelStore::with_seed_data();
        assert!(store.is_phishing_domain("metamask-io.com"));
        assert!(store.is_malicious_contract("0x00000000219AB540356cBB839Cbe05303d7705Fa"));
        assert!(!store.is_scam_spender("0x0000000000000000000000000000000000000001"));
        assert_eq!(store.legitimate_sites.iter().next(), Some("metamask.io"));
        assert_eq!(store.sizes().legitimate_sites, LEGITIMATE_SITES.len());
    }

    #[test]
    fn test_concurrent_readers_never_see_shrink() {
        use std::sync::Arc;

        let store = Arc::new(ThreatIntelStore::with_seed_data());
        let baseline = store.phishing_domains.len();

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for batch in 0..20 {
                    let domains: Vec<String> =
                        (0..50).map(|i| format!("scam-{}-{}.com", batch, i)).collect();
                    store.merge_phishing_domains(&domains);
                }
            })
        };

        let mut last = baseline;
        for _ in 0..200 {
            let now = store.phishing_domains.len();
            assert!(now >= last);
            assert!(store.is_phishing_domain("metamask-io.com"));
            last = now;
        }

        writer.join().unwrap();
        assert_eq!(store.phishing_domains.len(), baseline + 20 * 50);
    }
}
