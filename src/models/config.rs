//! Configuration module for CryptoGuard
//!
//! Uses constants from utils/constants.rs for every default.
//! Values are read from the environment once at startup.

use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    get_chain_name, CHAIN_ID_BSC, CHAIN_ID_ETHEREUM, DEFAULT_CACHE_TTL_SECS,
    DEFAULT_EXTERNAL_TIMEOUT_SECS, DEFAULT_FEED_REFRESH_SECS, DEFAULT_GOPLUS_API_URL, DEFAULT_HOST,
    DEFAULT_PORT, DEFAULT_THREAT_FEED_URL,
};

/// Chains the token security provider is queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChainId {
    #[default]
    Ethereum = 1,
    BinanceSmartChain = 56,
}

impl ChainId {
    /// Get chain from numeric ID
    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            CHAIN_ID_ETHEREUM => Some(Self::Ethereum),
            CHAIN_ID_BSC => Some(Self::BinanceSmartChain),
            _ => None,
        }
    }

    /// Unsupported chain ids fold to Ethereum
    pub fn fold(id: u64) -> Self {
        Self::from_id(id).unwrap_or_default()
    }

    /// Fold a chain id as the extension sends it ("1", "0x38", " 56 ")
    pub fn fold_str(raw: &str) -> Self {
        let raw = raw.trim();
        let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u64>().ok(),
        };
        parsed.map(Self::fold).unwrap_or_default()
    }

    pub fn id(&self) -> u64 {
        *self as u64
    }

    pub fn name(&self) -> &'static str {
        get_chain_name(self.id())
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Bind host for the HTTP service
    pub host: String,
    /// Bind port for the HTTP service
    pub port: u16,
    /// Remote phishing-domain feed (JSON array of strings)
    pub threat_feed_url: String,
    /// Interval between feed refreshes
    pub feed_refresh_interval: Duration,
    /// Token security API base URL
    pub goplus_api_url: String,
    /// Timeout applied to every outbound request
    pub external_timeout: Duration,
    /// How long a fetched security report is reused
    pub security_cache_ttl: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            threat_feed_url: DEFAULT_THREAT_FEED_URL.to_string(),
            feed_refresh_interval: Duration::from_secs(DEFAULT_FEED_REFRESH_SECS),
            goplus_api_url: DEFAULT_GOPLUS_API_URL.to_string(),
            external_timeout: Duration::from_secs(DEFAULT_EXTERNAL_TIMEOUT_SECS),
            security_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl GuardConfig {
    /// Build configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = lookup("PORT")
            .or_else(|| lookup("CRYPTOGUARD_PORT"))
            .map(|raw| parse_or_default("CRYPTOGUARD_PORT", &raw, defaults.port))
            .unwrap_or(defaults.port);

        let secs = |key: &str, default: Duration| -> Duration {
            lookup(key)
                .map(|raw| Duration::from_secs(parse_or_default(key, &raw, default.as_secs())))
                .unwrap_or(default)
        };

        Self {
            host: lookup("CRYPTOGUARD_HOST").unwrap_or(defaults.host),
            port,
            threat_feed_url: lookup("THREAT_FEED_URL").unwrap_or(defaults.threat_feed_url),
            feed_refresh_interval: secs("THREAT_FEED_REFRESH_SECS", defaults.feed_refresh_interval),
            goplus_api_url: lookup("GOPLUS_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.goplus_api_url),
            external_timeout: secs("EXTERNAL_TIMEOUT_SECS", defaults.external_timeout),
            security_cache_ttl: secs("SECURITY_CACHE_TTL_SECS", defaults.security_cache_ttl),
        }
    }

    /// "host:port" for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim().parse::<T>().map_err(|_| AppError::invalid_config(key, raw))
}

fn parse_or_default<T: FromStr + Copy>(key: &str, raw: &str, default: T) -> T {
    match parse_value(key, raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("⚠️ {} - using default", e);
            default
        }
    }
}
