//! Scan Statistics
//!
//! In-memory counters for the stats endpoint:
//! - scans per kind
//! - blocked verdicts (`safe == false`)
//! - findings by threat type
//!
//! Privacy-first: no URLs, addresses or amounts are kept, only counts.
//! Nothing is persisted; counters reset when the process restarts.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Instant;

use crate::models::types::{AnalysisResult, ThreatType};

/// What was scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanKind {
    Url,
    Contract,
    Approval,
}

impl ScanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Url => "url",
            ScanKind::Contract => "contract",
            ScanKind::Approval => "approval",
        }
    }
}

/// Snapshot served by the stats endpoint
#[derive(Debug, Clone, Serialize, Default)]
pub struct ScanStatsSnapshot {
    pub total_scans: u64,
    pub url_scans: u64,
    pub contract_scans: u64,
    pub approval_scans: u64,
    /// Results with `safe == false`
    pub blocked: u64,
    pub threats_by_type: HashMap<String, u64>,
    pub uptime_secs: u64,
}

/// Main stats collector
pub struct ScanStats {
    url_scans: AtomicU64,
    contract_scans: AtomicU64,
    approval_scans: AtomicU64,
    blocked: AtomicU64,
    threat_counts: RwLock<HashMap<ThreatType, u64>>,
    started_at: Instant,
}

impl Default for ScanStats {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanStats {
    pub fn new() -> Self {
        Self {
            url_scans: AtomicU64::new(0),
            contract_scans: AtomicU64::new(0),
            approval_scans: AtomicU64::new(0),
            blocked: AtomicU64::new(0),
            threat_counts: RwLock::new(HashMap::new()),
            started_at: Instant::now(),
        }
    }

    /// Record one finished scan
    pub fn record(&self, kind: ScanKind, result: &AnalysisResult) {
        let counter = match kind {
            ScanKind::Url => &self.url_scans,
            ScanKind::Contract => &self.contract_scans,
            ScanKind::Approval => &self.approval_scans,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if !result.safe {
            self.blocked.fetch_add(1, Ordering::Relaxed);
        }

        if result.threats.is_empty() {
            return;
        }

        if let Ok(mut counts) = self.threat_counts.write() {
            for threat in &result.threats {
                *counts.entry(threat.threat_type).or_insert(0) += 1;
            }
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Get current statistics
    pub fn snapshot(&self) -> ScanStatsSnapshot {
        let url_scans = self.url_scans.load(Ordering::Relaxed);
        let contract_scans = self.contract_scans.load(Ordering::Relaxed);
        let approval_scans = self.approval_scans.load(Ordering::Relaxed);

        let threats_by_type = self
            .threat_counts
            .read()
            .map(|counts| {
                counts
                    .iter()
                    .map(|(k, v)| (k.as_str().to_string(), *v))
                    .collect()
            })
            .unwrap_or_default();

        ScanStatsSnapshot {
            total_scans: url_scans + contract_scans + approval_scans,
            url_scans,
            contract_scans,
            approval_scans,
            blocked: self.blocked.load(Ordering::Relaxed),
            threats_by_type,
            uptime_secs: self.uptime_secs(),
        }
    }
}
