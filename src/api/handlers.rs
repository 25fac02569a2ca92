//! API Request Handlers

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::types::*;
use crate::core::engine::ThreatEngine;
use crate::models::errors::AppError;
use crate::models::types::AnalysisResult;
use crate::utils::constants::{APP_VERSION, CACHE_CLEANUP_INTERVAL_SECS};
use crate::utils::decoder::ApprovalDecoder;
use crate::utils::telemetry::{ScanKind, ScanStats};

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

/// Shared application state
pub struct AppState {
    pub engine: Arc<ThreatEngine>,
    pub stats: Arc<ScanStats>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: Arc<ThreatEngine>) -> Self {
        // Background task: cleanup expired report cache entries
        let cache = engine.report_cache().clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(CACHE_CLEANUP_INTERVAL_SECS));
            loop {
                interval.tick().await;
                let removed = cache.cleanup_expired();
                if removed > 0 {
                    info!("🧹 Cache cleanup: {} expired entries removed", removed);
                }
            }
        });

        Self {
            engine,
            stats: Arc::new(ScanStats::new()),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn reject(err: AppError, start: Instant) -> (StatusCode, Json<ApiResponse<()>>) {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    debug!(code = err.code_str(), "Request rejected: {}", err.message);
    (
        status,
        Json(ApiResponse::error(ApiError::from(&err), elapsed_ms(start))),
    )
}

fn require(field: &str, value: &str, start: Instant) -> Result<(), (StatusCode, Json<ApiResponse<()>>)> {
    if value.trim().is_empty() {
        return Err(reject(AppError::bad_request(format!("`{}` must not be empty", field)), start));
    }
    Ok(())
}

fn record(state: &AppState, kind: ScanKind, result: &AnalysisResult) {
    state.stats.record(kind, result);
    if !result.safe {
        info!(
            "{} Blocked {} scan: {} finding(s), risk {}",
            result.risk_level.emoji(),
            kind.as_str(),
            result.threats.len(),
            result.risk_level.as_str()
        );
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();

    let data = StatsData {
        scans: state.stats.snapshot(),
        store: state.engine.store().sizes(),
        report_cache: state.engine.cache_stats(),
        api_version: APP_VERSION.to_string(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// URL Analysis
// ============================================

pub async fn analyze_url(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UrlAnalysisRequest>,
) -> Json<ApiResponse<AnalysisResult>> {
    let start = Instant::now();

    let result = state.engine.analyze_url(&req.url);
    record(&state, ScanKind::Url, &result);

    Json(ApiResponse::success(result, elapsed_ms(start)))
}

// ============================================
// Contract Analysis
// ============================================

pub async fn analyze_contract(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContractAnalysisRequest>,
) -> HandlerResult<AnalysisResult> {
    let start = Instant::now();
    require("address", &req.address, start)?;

    let chain = req.chain_id.resolve();
    let result = state.engine.analyze_contract(&req.address, chain.id()).await;
    record(&state, ScanKind::Contract, &result);

    Ok(Json(ApiResponse::success(result, elapsed_ms(start))))
}

// ============================================
// Approval Analysis
// ============================================

pub async fn analyze_approval(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ApprovalAnalysisRequest>,
) -> HandlerResult<AnalysisResult> {
    let start = Instant::now();
    require("spender", &req.spender, start)?;

    let result = state.engine.analyze_approval(
        &req.spender,
        &req.amount.as_amount(),
        req.token_symbol.as_deref(),
    );
    record(&state, ScanKind::Approval, &result);

    Ok(Json(ApiResponse::success(result, elapsed_ms(start))))
}

// ============================================
// Raw Transaction (approve calldata)
// ============================================

pub async fn analyze_transaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransactionAnalysisRequest>,
) -> HandlerResult<TransactionAnalysisData> {
    let start = Instant::now();

    let call = ApprovalDecoder::decode(&req.data).ok_or_else(|| {
        reject(
            AppError::bad_request("Calldata is not an ERC-20 approve(address,uint256) call"),
            start,
        )
    })?;

    let amount = call.amount_decimal();
    let analysis = state
        .engine
        .analyze_approval(&call.spender, &amount, req.token_symbol.as_deref());
    record(&state, ScanKind::Approval, &analysis);

    let data = TransactionAnalysisData {
        method: "approve".to_string(),
        spender: call.spender,
        amount,
        analysis,
    };

    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}
