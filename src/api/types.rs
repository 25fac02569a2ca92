//! API Request/Response Types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::store::StoreSizes;
use crate::models::config::ChainId;
use crate::models::errors::AppError;
use crate::models::types::AnalysisResult;
use crate::utils::cache::CacheStats;
use crate::utils::telemetry::ScanStatsSnapshot;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: std::error::Error::source(err).map(|s| s.to_string()),
        }
    }
}

// ============================================
// Flexible inputs
// ============================================

/// Chain id as sent by the extension: a number, a numeric string, or junk.
/// Anything unsupported folds to Ethereum.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChainIdInput {
    Number(u64),
    Text(String),
    Other(Value),
}

impl Default for ChainIdInput {
    fn default() -> Self {
        Self::Number(ChainId::default().id())
    }
}

impl ChainIdInput {
    pub fn resolve(&self) -> ChainId {
        match self {
            Self::Number(id) => ChainId::fold(*id),
            Self::Text(raw) => ChainId::fold_str(raw),
            Self::Other(_) => ChainId::default(),
        }
    }
}

/// Approval amount, either a string or a JSON number
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(serde_json::Number),
}

impl AmountInput {
    pub fn as_amount(&self) -> String {
        match self {
            Self::Text(raw) => raw.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

// ============================================
// Analysis requests
// ============================================

#[derive(Debug, Deserialize)]
pub struct UrlAnalysisRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAnalysisRequest {
    pub address: String,
    #[serde(default)]
    pub chain_id: ChainIdInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalAnalysisRequest {
    pub spender: String,
    pub amount: AmountInput,
    #[serde(default)]
    pub token_symbol: Option<String>,
}

/// Raw transaction calldata, hex with or without 0x
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAnalysisRequest {
    pub data: String,
    #[serde(default)]
    pub token_symbol: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionAnalysisData {
    pub method: String,
    pub spender: String,
    /// Decimal string
    pub amount: String,
    pub analysis: AnalysisResult,
}

// ============================================
// Stats
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    pub scans: ScanStatsSnapshot,
    pub store: StoreSizes,
    pub report_cache: CacheStats,
    pub api_version: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
