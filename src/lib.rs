//! CryptoGuard Threat Analysis Library
//!
//! Threat-analysis engine behind the CryptoGuard browser extension:
//! - Phishing domains and typosquatting of well-known crypto sites
//! - Suspicious URL patterns (airdrops, fake rewards, free mints)
//! - Risky token contracts via an external token-security provider
//! - Unlimited ERC-20 approvals and known drainer spenders

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{SyncOutcome, ThreatEngine, ThreatIntelStore, ThreatSynchronizer};
pub use models::config::{ChainId, GuardConfig};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{
    AnalysisRequest, AnalysisResult, RiskLevel, Severity, ThreatFinding, ThreatType,
    TokenSecurityReport,
};
pub use providers::{GoPlusClient, HttpThreatFeed, ThreatFeedSource, TokenSecuritySource};
pub use utils::cache::{CacheStats, SecurityReportCache};
pub use utils::decoder::{ApprovalCall, ApprovalDecoder};
pub use utils::telemetry::{ScanKind, ScanStats};
