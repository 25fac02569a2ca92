//! Threat Engine
//!
//! Single entry point shared by every request handler. Owns one store and
//! hands it to each analyzer; nothing here is global.

use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::core::approval_analyzer::ApprovalAnalyzer;
use crate::core::contract_analyzer::ContractAnalyzer;
use crate::core::store::ThreatIntelStore;
use crate::core::synchronizer::ThreatSynchronizer;
use crate::core::url_analyzer::UrlAnalyzer;
use crate::models::config::GuardConfig;
use crate::models::types::{AnalysisRequest, AnalysisResult};
use crate::providers::goplus::TokenSecuritySource;
use crate::providers::threat_feed::ThreatFeedSource;
use crate::utils::cache::{CacheStats, SecurityReportCache};

pub struct ThreatEngine {
    store: Arc<ThreatIntelStore>,
    urls: UrlAnalyzer,
    contracts: ContractAnalyzer,
    approvals: ApprovalAnalyzer,
}

impl ThreatEngine {
    pub fn new(store: Arc<ThreatIntelStore>, security: Arc<dyn TokenSecuritySource>) -> Self {
        Self {
            urls: UrlAnalyzer::new(store.clone()),
            contracts: ContractAnalyzer::new(store.clone(), security),
            approvals: ApprovalAnalyzer::new(store.clone()),
            store,
        }
    }

    /// Engine with timeouts and cache TTL taken from configuration
    pub fn from_config(
        config: &GuardConfig,
        store: Arc<ThreatIntelStore>,
        security: Arc<dyn TokenSecuritySource>,
    ) -> Self {
        let mut engine = Self::new(store, security);
        engine.contracts = engine
            .contracts
            .with_cache(SecurityReportCache::with_ttl(config.security_cache_ttl))
            .with_timeout(config.external_timeout);

        info!(
            "🧠 Threat engine ready: {} phishing domains, {} malicious contracts, {} legitimate sites",
            engine.store.phishing_domains.len(),
            engine.store.malicious_contracts.len(),
            engine.store.legitimate_sites.len()
        );
        engine
    }

    pub fn store(&self) -> &Arc<ThreatIntelStore> {
        &self.store
    }

    pub fn report_cache(&self) -> &SecurityReportCache {
        self.contracts.cache()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.contracts.cache().stats()
    }

    /// Synchronizer feeding this engine's store
    pub fn synchronizer(
        &self,
        feed: Arc<dyn ThreatFeedSource>,
        interval: Duration,
        timeout: Duration,
    ) -> ThreatSynchronizer {
        ThreatSynchronizer::new(self.store.clone(), feed)
            .with_interval(interval)
            .with_timeout(timeout)
    }

    pub fn analyze_url(&self, url: &str) -> AnalysisResult {
        self.urls.analyze(url)
    }

    pub async fn analyze_contract(&self, address: &str, chain_id: u64) -> AnalysisResult {
        self.contracts.analyze(address, chain_id).await
    }

    pub fn analyze_approval(
        &self,
        spender: &str,
        amount: &str,
        token_symbol: Option<&str>,
    ) -> AnalysisResult {
        self.approvals.analyze(spender, amount, token_symbol)
    }

    /// Dispatch an inbound request to the matching analyzer
    pub async fn handle(&self, request: AnalysisRequest) -> AnalysisResult {
        match request {
            AnalysisRequest::AnalyzeUrl { url } => self.analyze_url(&url),
            AnalysisRequest::AnalyzeContract { address, chain_id } => {
                self.analyze_contract(&address, chain_id).await
            }
            AnalysisRequest::AnalyzeApproval {
                spender,
                amount,
                token_symbol,
            } => self.analyze_approval(&spender, &amount, token_symbol.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::ChainId;
    use crate::models::errors::AppResult;
    use crate::models::types::{RiskLevel, ThreatType, TokenSecurityReport};
    use async_trait::async_trait;

    struct NoReports;

    #[async_trait]
    impl TokenSecuritySource for NoReports {
        async fn fetch_report(
            &self,
            _chain: ChainId,
            _address: &str,
        ) -> AppResult<Option<TokenSecurityReport>> {
            Ok(None)
        }
    }

    fn engine() -> ThreatEngine {
        ThreatEngine::new(Arc::new(ThreatIntelStore::with_seed_data()), Arc::new(NoReports))
    }

    #[tokio::test]
    async fn test_handle_dispatches_url() {
        let result = engine()
            .handle(AnalysisRequest::AnalyzeUrl {
                url: "https://metamask-io.com/connect".to_string(),
            })
            .await;
        assert!(!result.safe);
        assert!(result.has_threat(ThreatType::Phishing));
    }

    #[tokio::test]
    async fn test_handle_dispatches_contract() {
        let result = engine()
            .handle(AnalysisRequest::AnalyzeContract {
                address: "0x00000000219ab540356cbb839cbe05303d7705fa".to_string(),
                chain_id: 137,
            })
            .await;
        assert_eq!(result.risk_level, RiskLevel::Critical);
    }

    #[tokio::test]
    async fn test_handle_dispatches_approval() {
        let result = engine()
            .handle(AnalysisRequest::AnalyzeApproval {
                spender: "0x2222222222222222222222222222222222222222".to_string(),
                amount: "1e40".to_string(),
                token_symbol: Some("DAI".to_string()),
            })
            .await;
        assert!(result.has_threat(ThreatType::InfiniteApproval));
    }

    #[test]
    fn test_engines_share_store() {
        let engine = engine();
        engine.store().merge_phishing_domains(["fresh-scam.io"]);
        assert!(!engine.analyze_url("https://fresh-scam.io").safe);
    }
}
