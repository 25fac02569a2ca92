//! Threat Intelligence Synchronizer
//!
//! Pulls the remote phishing feed into the store on a fixed interval.
//! Merges are union-only: a refresh can grow the domain set but never
//! shrinks it, and a bad payload leaves it exactly as it was.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::store::ThreatIntelStore;
use crate::models::errors::AppError;
use crate::providers::threat_feed::ThreatFeedSource;
use crate::utils::constants::{DEFAULT_EXTERNAL_TIMEOUT_SECS, DEFAULT_FEED_REFRESH_SECS};

/// What a single refresh did, for logs and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Feed accepted; `added` of `received` entries were new
    Merged { received: usize, added: usize },
    /// Feed rejected or unreachable, store untouched
    Skipped { reason: String },
}

impl SyncOutcome {
    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

pub struct ThreatSynchronizer {
    store: Arc<ThreatIntelStore>,
    feed: Arc<dyn ThreatFeedSource>,
    interval: Duration,
    timeout: Duration,
}

impl ThreatSynchronizer {
    pub fn new(store: Arc<ThreatIntelStore>, feed: Arc<dyn ThreatFeedSource>) -> Self {
        Self {
            store,
            feed,
            interval: Duration::from_secs(DEFAULT_FEED_REFRESH_SECS),
            timeout: Duration::from_secs(DEFAULT_EXTERNAL_TIMEOUT_SECS),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch the feed once and merge it. Never fails; failures come back
    /// as `Skipped` after being logged.
    pub async fn refresh(&self) -> SyncOutcome {
        let fetched = tokio::time::timeout(self.timeout, self.feed.fetch_domains())
            .await
            .unwrap_or_else(|_| {
                Err(AppError::timeout(format!(
                    "Threat feed did not answer within {}s",
                    self.timeout.as_secs()
                )))
            });

        match fetched {
            Ok(domains) => {
                let received = domains.len();
                let added = self.store.merge_phishing_domains(&domains);
                info!(
                    "🛡️ Threat feed synced from {}: {} received, {} new, {} total",
                    self.feed.name(),
                    received,
                    added,
                    self.store.phishing_domains.len()
                );
                SyncOutcome::Merged { received, added }
            }
            Err(e) => {
                warn!(
                    code = e.code_str(),
                    retryable = e.code.is_retryable(),
                    "⚠️ Threat feed sync skipped: {}",
                    e
                );
                SyncOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Run `refresh` now and then every interval, forever.
    pub fn spawn(self) -> JoinHandle<()> {
        let this = Arc::new(self);
        tokio::spawn(async move {
            // first tick completes immediately; a zero period would panic
            let mut ticker = tokio::time::interval(this.interval.max(Duration::from_secs(1)));
            loop {
                ticker.tick().await;
                this.refresh().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::AppResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedFeed {
        responses: Mutex<Vec<AppResult<Vec<String>>>>,
    }

    impl ScriptedFeed {
        fn new(responses: Vec<AppResult<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
            })
        }
    }

    #[async_trait]
    impl ThreatFeedSource for ScriptedFeed {
        async fn fetch_domains(&self) -> AppResult<Vec<String>> {
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(Vec::new())
            } else {
                responses.remove(0)
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn domains(list: &[&str]) -> AppResult<Vec<String>> {
        Ok(list.iter().map(|d| d.to_string()).collect())
    }

    #[tokio::test]
    async fn test_merge_normalizes_and_is_idempotent() {
        let store = Arc::new(ThreatIntelStore::empty());
        let payload = &["Scam-One.io", "www.scam-two.io", "scam-one.io"];
        let feed = ScriptedFeed::new(vec![domains(payload), domains(payload)]);
        let sync = ThreatSynchronizer::new(store.clone(), feed);

        assert_eq!(sync.refresh().await, SyncOutcome::Merged { received: 3, added: 2 });
        assert!(store.is_phishing_domain("scam-two.io"));

        assert_eq!(sync.refresh().await, SyncOutcome::Merged { received: 3, added: 0 });
        assert_eq!(store.phishing_domains.len(), 2);
    }

    #[tokio::test]
    async fn test_failure_leaves_store_untouched() {
        let store = Arc::new(ThreatIntelStore::with_seed_data());
        let before = store.sizes();
        let feed = ScriptedFeed::new(vec![
            Err(AppError::feed_malformed("Feed is not a JSON array")),
            Err(AppError::feed_bad_status(503)),
        ]);
        let sync = ThreatSynchronizer::new(store.clone(), feed);

        assert!(!sync.refresh().await.is_merged());
        assert!(!sync.refresh().await.is_merged());
        assert_eq!(store.sizes(), before);
    }

    #[tokio::test]
    async fn test_merge_never_removes() {
        let store = Arc::new(ThreatIntelStore::with_seed_data());
        let before = store.phishing_domains.len();
        let feed = ScriptedFeed::new(vec![domains(&["brand-new-scam.io"])]);
        ThreatSynchronizer::new(store.clone(), feed).refresh().await;

        assert_eq!(store.phishing_domains.len(), before + 1);
        assert!(store.is_phishing_domain("metamask-io.com"));
    }

    struct HangingFeed;

    #[async_trait]
    impl ThreatFeedSource for HangingFeed {
        async fn fetch_domains(&self) -> AppResult<Vec<String>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec!["late.io".to_string()])
        }

        fn name(&self) -> &str {
            "hanging"
        }
    }

    #[tokio::test]
    async fn test_timeout_is_skipped() {
        let store = Arc::new(ThreatIntelStore::empty());
        let sync = ThreatSynchronizer::new(store.clone(), Arc::new(HangingFeed))
            .with_timeout(Duration::from_millis(20));

        match sync.refresh().await {
            SyncOutcome::Skipped { reason } => assert!(reason.contains("EXTERNAL_TIMEOUT")),
            other => panic!("expected skip, got {:?}", other),
        }
        assert!(store.phishing_domains.is_empty());
    }

    #[tokio::test]
    async fn test_spawn_runs_first_refresh_immediately() {
        let store = Arc::new(ThreatIntelStore::empty());
        let feed = ScriptedFeed::new(vec![domains(&["instant.io"])]);
        let handle = ThreatSynchronizer::new(store.clone(), feed)
            .with_interval(Duration::from_secs(3600))
            .spawn();

        for _ in 0..50 {
            if store.is_phishing_domain("instant.io") {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();
        assert!(store.is_phishing_domain("instant.io"));
    }
}
