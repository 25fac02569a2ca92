//! Token Security Report Cache
//!
//! Thread-safe cache for provider reports, keyed by chain and address.
//! Uses DashMap for concurrent access without a global lock.
//!
//! Features:
//! - TTL-based expiration (5 minutes default)
//! - Address normalization (lowercase)
//! - Hit/miss counters
//! - Caches "provider has no entry" as well as real reports

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::models::config::ChainId;
use crate::models::types::TokenSecurityReport;
use crate::utils::constants::DEFAULT_CACHE_TTL_SECS;

/// Cache entry with its insertion time
#[derive(Clone, Debug)]
pub struct CacheEntry {
    /// `None` when the provider had nothing for this address
    pub report: Option<TokenSecurityReport>,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }

    /// Seconds left before expiry
    pub fn remaining_ttl(&self) -> u64 {
        self.ttl.saturating_sub(self.created_at.elapsed()).as_secs()
    }
}

#[derive(Clone)]
pub struct SecurityReportCache {
    /// "<chain>:<lowercase address>" -> entry
    store: Arc<DashMap<String, CacheEntry>>,
    ttl: Duration,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl Default for SecurityReportCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityReportCache {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    #[inline]
    fn key(chain: ChainId, address: &str) -> String {
        format!("{}:{}", chain.id(), address.trim().to_lowercase())
    }

    /// Outer `None` is a miss; `Some(None)` is a cached "no report"
    pub fn get(&self, chain: ChainId, address: &str) -> Option<Option<TokenSecurityReport>> {
        let key = Self::key(chain, address);

        if let Some(entry) = self.store.get(&key) {
            if entry.is_expired() {
                drop(entry); // release the shard read lock before removing
                self.store.remove(&key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("📭 CACHE MISS (expired): {}", key);
                None
            } else {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("✅ CACHE HIT: {} (TTL: {}s remaining)", key, entry.remaining_ttl());
                Some(entry.report.clone())
            }
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("📭 CACHE MISS: {}", key);
            None
        }
    }

    pub fn set(&self, chain: ChainId, address: &str, report: Option<TokenSecurityReport>) {
        let key = Self::key(chain, address);
        let entry = CacheEntry {
            report,
            created_at: Instant::now(),
            ttl: self.ttl,
        };
        debug!("💾 CACHE SET: {} (TTL: {}s)", key, self.ttl.as_secs());
        self.store.insert(key, entry);
    }

    /// Drop every expired entry, returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired());
        before.saturating_sub(self.store.len())
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            hit_rate,
            ttl_secs: self.ttl.as_secs(),
        }
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}
