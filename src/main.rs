//! CryptoGuard API Server
//!
//! Threat-analysis backend for the CryptoGuard browser extension
//!
//! Usage:
//!   cargo run --bin cryptoguard_api
//!
//! Environment:
//!   PORT / CRYPTOGUARD_PORT   - Server port (default: 8080)
//!   CRYPTOGUARD_HOST          - Server host (default: 0.0.0.0)
//!   THREAT_FEED_URL           - Phishing domain feed (JSON array)
//!   THREAT_FEED_REFRESH_SECS  - Feed refresh interval (default: 21600)
//!   GOPLUS_API_URL            - Token security API base URL
//!   EXTERNAL_TIMEOUT_SECS     - Outbound request timeout (default: 10)
//!   SECURITY_CACHE_TTL_SECS   - Token report cache TTL (default: 300)
//!   RUST_LOG                  - Log level (default: info)

use cryptoguard::api::{create_router, AppState};
use cryptoguard::utils::constants::APP_NAME;
use cryptoguard::{GoPlusClient, GuardConfig, HttpThreatFeed, ThreatEngine, ThreatIntelStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = GuardConfig::from_env();

    // Threat intel store shared by the engine and the synchronizer
    let store = Arc::new(ThreatIntelStore::with_seed_data());
    let security = Arc::new(GoPlusClient::new(
        config.goplus_api_url.clone(),
        config.external_timeout,
    ));
    let engine = Arc::new(ThreatEngine::from_config(&config, store, security));

    // First refresh runs immediately, then every interval
    let feed = Arc::new(HttpThreatFeed::new(
        config.threat_feed_url.clone(),
        config.external_timeout,
    ));
    let sync_task = engine
        .synchronizer(feed, config.feed_refresh_interval, config.external_timeout)
        .spawn();
    info!(
        "🔄 Threat feed sync every {}s from {}",
        config.feed_refresh_interval.as_secs(),
        config.threat_feed_url
    );

    let state = Arc::new(AppState::new(engine));
    let stats = state.stats.clone();
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;

    info!("🚀 {} API starting on http://{}", APP_NAME, addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /v1/analyze/url          - Phishing, typosquatting, URL patterns");
    info!("  POST /v1/analyze/contract     - Token contract risk");
    info!("  POST /v1/analyze/approval     - ERC-20 approval risk");
    info!("  POST /v1/analyze/transaction  - Decode approve calldata and analyze");
    info!("  GET  /v1/stats                - Scan statistics");
    info!("  GET  /v1/health               - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("🛑 Shutdown signal received, cleaning up...");
    sync_task.abort();

    let snapshot = stats.snapshot();
    info!("   Total scans: {}", snapshot.total_scans);
    info!("   Blocked: {}", snapshot.blocked);
    info!("👋 {} API shutdown complete", APP_NAME);

    Ok(())
}
