//! GoPlus Token Security Client
//!
//! API: https://api.gopluslabs.io/api/v1/token_security/{chain}?contract_addresses={address}
//! Free, no API key required.
//!
//! The provider encodes flags as "1"/"0" strings and numbers as strings.
//! Taxes come as fractions ("0.6" is 60%) and are scaled to percentages here.
//! Anything it omits, or encodes in a shape we don't recognise, becomes
//! `None` on the report: unknown is never read as false.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::core::store::normalize_address;
use crate::models::config::ChainId;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::TokenSecurityReport;
use crate::utils::constants::{DEFAULT_EXTERNAL_TIMEOUT_SECS, DEFAULT_GOPLUS_API_URL, USER_AGENT};

/// Source of per-token security reports
#[async_trait]
pub trait TokenSecuritySource: Send + Sync {
    /// `Ok(None)` when the provider has no entry for the address
    async fn fetch_report(
        &self,
        chain: ChainId,
        address: &str,
    ) -> AppResult<Option<TokenSecurityReport>>;
}

/// Top-level GoPlus envelope
#[derive(Debug, Deserialize)]
pub struct GoPlusResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    /// Object keyed by lower-case contract address
    #[serde(default)]
    pub result: Option<Value>,
}

/// Raw per-token entry, every field kept untyped
#[derive(Debug, Default, Deserialize)]
pub struct RawTokenSecurity {
    #[serde(default)]
    pub is_honeypot: Option<Value>,
    #[serde(default)]
    pub is_blacklisted: Option<Value>,
    #[serde(default)]
    pub can_take_back_ownership: Option<Value>,
    #[serde(default)]
    pub hidden_owner: Option<Value>,
    #[serde(default)]
    pub is_mintable: Option<Value>,
    #[serde(default)]
    pub sell_tax: Option<Value>,
    #[serde(default)]
    pub holder_count: Option<Value>,
}

impl From<RawTokenSecurity> for TokenSecurityReport {
    fn from(raw: RawTokenSecurity) -> Self {
        Self {
            is_honeypot: raw.is_honeypot.as_ref().and_then(parse_flag),
            is_blacklisted: raw.is_blacklisted.as_ref().and_then(parse_flag),
            can_take_back_ownership: raw.can_take_back_ownership.as_ref().and_then(parse_flag),
            hidden_owner: raw.hidden_owner.as_ref().and_then(parse_flag),
            is_mintable: raw.is_mintable.as_ref().and_then(parse_flag),
            sell_tax: raw.sell_tax.as_ref().and_then(parse_f64).map(fraction_to_percent),
            holder_count: raw.holder_count.as_ref().and_then(parse_u64),
        }
    }
}

/// "1"/"0", 1/0 or true/false
pub fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// GoPlus fraction (0.0..=1.0) to the percentage the rules work with
pub fn fraction_to_percent(fraction: f64) -> f64 {
    fraction * 100.0
}

/// Integer counts; fractional encodings are truncated
pub fn parse_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| parse_f64(value).and_then(truncate_u64)),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .ok()
            .or_else(|| parse_f64(value).and_then(truncate_u64)),
        _ => None,
    }
}

fn truncate_u64(v: f64) -> Option<u64> {
    (v >= 0.0 && v < u64::MAX as f64).then(|| v.trunc() as u64)
}

/// Extract the report for `address` from a raw response body
pub fn parse_report(body: &str, address: &str) -> AppResult<Option<TokenSecurityReport>> {
    let response: GoPlusResponse = serde_json::from_str(body)?;
    let key = normalize_address(address);

    let Some(entry) = response.result.as_ref().and_then(|r| r.get(&key)) else {
        debug!(
            code = ?response.code,
            message = ?response.message,
            "GoPlus has no entry for {}",
            key
        );
        return Ok(None);
    };

    let raw: RawTokenSecurity = serde_json::from_value(entry.clone())
        .map_err(|e| AppError::security_malformed(format!("Unexpected token entry for {}: {}", key, e)))?;

    Ok(Some(raw.into()))
}

/// GoPlus API client
pub struct GoPlusClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Default for GoPlusClient {
    fn default() -> Self {
        Self::new(
            DEFAULT_GOPLUS_API_URL,
            Duration::from_secs(DEFAULT_EXTERNAL_TIMEOUT_SECS),
        )
    }
}

impl GoPlusClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn report_url(&self, chain: ChainId, address: &str) -> String {
        format!(
            "{}/token_security/{}?contract_addresses={}",
            self.base_url,
            chain.id(),
            normalize_address(address)
        )
    }
}

#[async_trait]
impl TokenSecuritySource for GoPlusClient {
    async fn fetch_report(
        &self,
        chain: ChainId,
        address: &str,
    ) -> AppResult<Option<TokenSecurityReport>> {
        let url = self.report_url(chain, address);
        debug!("🔍 GoPlus: fetching {} on {}", address, chain.name());

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::security_bad_status(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_report(&body, address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use serde_json::json;

    const TOKEN: &str = "0xAbCdEf0000000000000000000000000000000001";

    #[test]
    fn test_flag_parsing() {
        assert_eq!(parse_flag(&json!("1")), Some(true));
        assert_eq!(parse_flag(&json!("0")), Some(false));
        assert_eq!(parse_flag(&json!(1)), Some(true));
        assert_eq!(parse_flag(&json!(false)), Some(false));
        assert_eq!(parse_flag(&json!("")), None);
        assert_eq!(parse_flag(&json!("yes")), None);
        assert_eq!(parse_flag(&Value::Null), None);
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(parse_f64(&json!("20")), Some(20.0));
        assert_eq!(parse_f64(&json!(" 0.5 ")), Some(0.5));
        assert_eq!(parse_f64(&json!("")), None);
        assert_eq!(parse_u64(&json!("1234")), Some(1234));
        assert_eq!(parse_u64(&json!(49)), Some(49));
        assert_eq!(parse_u64(&json!("12.9")), Some(12));
        assert_eq!(parse_u64(&json!("-3")), None);
        assert_eq!(parse_u64(&json!("many")), None);
    }

    #[test]
    fn test_parse_full_report() {
        let body = json!({
            "code": 1,
            "message": "OK",
            "result": {
                "0xabcdef0000000000000000000000000000000001": {
                    "is_honeypot": "1",
                    "is_blacklisted": "0",
                    "hidden_owner": "0",
                    "is_mintable": "1",
                    "sell_tax": "0.6",
                    "holder_count": "12"
                }
            }
        })
        .to_string();

        let report = parse_report(&body, TOKEN).unwrap().unwrap();
        assert_eq!(report.is_honeypot, Some(true));
        assert_eq!(report.is_blacklisted, Some(false));
        assert_eq!(report.can_take_back_ownership, None);
        assert_eq!(report.is_mintable, Some(true));
        assert!((report.sell_tax.unwrap() - 60.0).abs() < 1e-9);
        assert_eq!(report.holder_count, Some(12));
    }

    #[test]
    fn test_fractional_sell_tax_drives_tax_rule() {
        use crate::core::contract_analyzer::evaluate_report;
        use crate::models::types::{Severity, ThreatType};

        let tier = |tax: &str| {
            let body = json!({ "result": { "0xabc": { "sell_tax": tax } } }).to_string();
            let report = parse_report(&body, "0xabc").unwrap().unwrap();
            let findings = evaluate_report(&report);
            assert_eq!(findings.len(), 1, "sell_tax {}", tax);
            assert_eq!(findings[0].threat_type, ThreatType::HighTax);
            findings[0].severity
        };

        assert_eq!(tier("0.6"), Severity::Critical);
        assert_eq!(tier("0.2"), Severity::High);

        let body = json!({ "result": { "0xabc": { "sell_tax": "0.05" } } }).to_string();
        let report = parse_report(&body, "0xabc").unwrap().unwrap();
        assert!(evaluate_report(&report).is_empty());
    }

    #[test]
    fn test_missing_entry_is_no_report() {
        let body = json!({ "code": 1, "message": "OK", "result": {} }).to_string();
        assert_eq!(parse_report(&body, TOKEN).unwrap(), None);

        let body = json!({ "code": 2, "message": "bad chain" }).to_string();
        assert_eq!(parse_report(&body, TOKEN).unwrap(), None);
    }

    #[test]
    fn test_malformed_body_is_error() {
        let err = parse_report("<html>rate limited</html>", TOKEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::SecurityMalformed);

        let body = json!({ "result": { "0xabcdef0000000000000000000000000000000001": "nope" } })
            .to_string();
        let err = parse_report(&body, TOKEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::SecurityMalformed);
    }

    #[test]
    fn test_report_url() {
        let client = GoPlusClient::new("http://localhost:1/api/v1", Duration::from_secs(1));
        assert_eq!(
            client.report_url(ChainId::BinanceSmartChain, TOKEN),
            "http://localhost:1/api/v1/token_security/56?contract_addresses=0xabcdef0000000000000000000000000000000001"
        );
    }
}
