//! Constants Module - Single Source of Truth
//!
//! Seed threat lists, the legitimate-site registry, rule thresholds and
//! provider defaults live here. No hardcoded values in other modules.

// ============================================
// APPLICATION CONSTANTS
// ============================================

pub const APP_NAME: &str = "CryptoGuard";

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for outbound HTTP requests
pub const USER_AGENT: &str = concat!("CryptoGuard/", env!("CARGO_PKG_VERSION"));

// ============================================
// PROVIDER DEFAULTS
// ============================================

/// CryptoScamDB domain list (JSON array of strings)
pub const DEFAULT_THREAT_FEED_URL: &str =
    "https://raw.githubusercontent.com/niclas-sky/cryptoscamdb/master/output/domains.json";

/// GoPlus Security API base
pub const DEFAULT_GOPLUS_API_URL: &str = "https://api.gopluslabs.io/api/v1";

/// Feed refresh cadence: 6 hours
pub const DEFAULT_FEED_REFRESH_SECS: u64 = 6 * 60 * 60;

/// Timeout for every outbound request (seconds)
pub const DEFAULT_EXTERNAL_TIMEOUT_SECS: u64 = 10;

/// Security report cache TTL (seconds)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Interval between cache sweeps (seconds)
pub const CACHE_CLEANUP_INTERVAL_SECS: u64 = 60;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// ============================================
// CHAIN IDS
// ============================================

/// Ethereum Mainnet
pub const CHAIN_ID_ETHEREUM: u64 = 1;
/// BNB Smart Chain
pub const CHAIN_ID_BSC: u64 = 56;

pub fn get_chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_ID_ETHEREUM => "Ethereum",
        CHAIN_ID_BSC => "BNB Smart Chain",
        _ => "Unknown",
    }
}

// ============================================
// THREAT INTELLIGENCE SEEDS
// ============================================

/// Known phishing domains shipped with the binary; the feed only adds to these
pub const SEED_PHISHING_DOMAINS: &[&str] = &[
    // MetaMask
    "metamask-io.com",
    "metamasks.io",
    "meta-mask.io",
    "metamask.com.co",
    "metamask-extension.com",
    "metamaskwallet.io",
    "rnetamask.io",
    // Uniswap
    "uniswap-app.com",
    "uniswaps.org",
    "uniswap.exchange.com",
    "uniswapv3.io",
    "uniswapdex.com",
    // OpenSea
    "opensea.io.com",
    "openseas.io",
    "open-sea.io",
    // Coinbase
    "coinbase-wallet.com",
    "coinbasepro.io",
    "coinbase.app.com",
    // Aave
    "aave-app.com",
    "aaves.finance",
    // Compound
    "compound-finance.app",
    "compoundprotocol.com",
    // Generic lures
    "claimrewards.net",
    "airdrop-claim.com",
    "wallet-connect.app",
    "walletconnect.network.com",
    "nft-claim.io",
    "mint-nft.app",
];

/// Known wallet-draining contracts
pub const SEED_MALICIOUS_CONTRACTS: &[&str] = &["0x00000000219ab540356cbb839cbe05303d7705fa"];

/// Known scam spenders; populated by operators, empty by default
pub const SEED_SCAM_SPENDERS: &[&str] = &[];

/// Legitimate sites used as typosquatting comparison targets, in order
pub const LEGITIMATE_SITES: &[&str] = &[
    "metamask.io",
    "uniswap.org",
    "opensea.io",
    "coinbase.com",
    "aave.com",
    "compound.finance",
    "curve.fi",
    "sushiswap.org",
    "pancakeswap.finance",
    "raydium.io",
    "phantom.app",
];

// ============================================
// RULE THRESHOLDS
// ============================================

/// Candidates whose length differs by more than this are never compared
pub const TYPOSQUAT_MAX_LENGTH_DIFF: usize = 3;
/// Inclusive edit-distance window that counts as an imitation
pub const TYPOSQUAT_MIN_DISTANCE: usize = 1;
pub const TYPOSQUAT_MAX_DISTANCE: usize = 2;

/// Sell tax (percent) above which HIGH_TAX fires
pub const HIGH_TAX_THRESHOLD_PERCENT: f64 = 10.0;
/// Sell tax (percent) above which HIGH_TAX escalates to CRITICAL
pub const CRITICAL_TAX_THRESHOLD_PERCENT: f64 = 49.0;

/// Holder counts below this fire FEW_HOLDERS
pub const MIN_HOLDER_COUNT: u64 = 50;

/// 2^256 - 1 in decimal, the canonical "unlimited" approve amount
pub const MAX_UINT256_DECIMAL: &str =
    "115792089237316195423570985008687907853269984665640564039457584007913129639935";

/// Approvals numerically above 10^30 are treated as unlimited
pub const INFINITE_APPROVAL_EXPONENT: usize = 30;
pub const INFINITE_APPROVAL_THRESHOLD: f64 = 1e30;

/// ERC-20 approve(address,uint256) selector
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];
