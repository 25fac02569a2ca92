//! Core Module - Threat Analysis Engine
//!
//! Store, detectors, analyzers and the feed synchronizer.
//! Everything here is transport-agnostic; the HTTP layer lives in `api`.

pub mod aggregator;
pub mod approval_analyzer;
pub mod contract_analyzer;
pub mod domain;
pub mod engine;
pub mod store;
pub mod synchronizer;
pub mod typosquat;
pub mod url_analyzer;
pub mod url_rules;

pub use aggregator::{derive_level, has_blocking_severity};
pub use approval_analyzer::{is_infinite_approval, ApprovalAnalyzer};
pub use contract_analyzer::{evaluate_report, ContractAnalyzer};
pub use engine::ThreatEngine;
pub use store::*;
pub use synchronizer::{SyncOutcome, ThreatSynchronizer};
pub use url_analyzer::UrlAnalyzer;
