//! Remote Phishing-Domain Feed
//!
//! The feed is a JSON array of domain strings (CryptoScamDB format).
//! A payload with any other shape is rejected as a whole.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::utils::constants::{DEFAULT_EXTERNAL_TIMEOUT_SECS, DEFAULT_THREAT_FEED_URL, USER_AGENT};

/// Source of phishing domains for the synchronizer
#[async_trait]
pub trait ThreatFeedSource: Send + Sync {
    /// Every domain in the feed, un-normalized
    async fn fetch_domains(&self) -> AppResult<Vec<String>>;

    /// Short label for logs
    fn name(&self) -> &str;
}

/// Validate a feed body: a JSON array whose elements are all strings
pub fn parse_feed_payload(body: &str) -> AppResult<Vec<String>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::with_source(ErrorCode::FeedMalformed, "Feed is not valid JSON", e))?;

    let Value::Array(items) = value else {
        return Err(AppError::feed_malformed("Feed is not a JSON array"));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(domain) => Ok(domain),
            other => Err(AppError::feed_malformed(format!(
                "Feed entry {} is not a string: {}",
                i, other
            ))),
        })
        .collect()
}

/// HTTP feed client
pub struct HttpThreatFeed {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl Default for HttpThreatFeed {
    fn default() -> Self {
        Self::new(
            DEFAULT_THREAT_FEED_URL,
            Duration::from_secs(DEFAULT_EXTERNAL_TIMEOUT_SECS),
        )
    }
}

impl HttpThreatFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ThreatFeedSource for HttpThreatFeed {
    async fn fetch_domains(&self) -> AppResult<Vec<String>> {
        debug!("🌐 Fetching threat feed: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::timeout("Threat feed request timed out")
                } else {
                    AppError::with_source(ErrorCode::FeedUnreachable, "Threat feed unreachable", e)
                }
            })?;

        if !response.status().is_success() {
            return Err(AppError::feed_bad_status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::with_source(ErrorCode::FeedUnreachable, "Threat feed body lost", e))?;

        parse_feed_payload(&body)
    }

    fn name(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payload() {
        let domains = parse_feed_payload(r#"["Scam.io", "www.drainer.app"]"#).unwrap();
        assert_eq!(domains, vec!["Scam.io".to_string(), "www.drainer.app".to_string()]);
    }

    #[test]
    fn test_empty_array_is_valid() {
        assert!(parse_feed_payload("[]").unwrap().is_empty());
    }

    #[test]
    fn test_non_array_rejected() {
        let err = parse_feed_payload(r#"{"domains": ["scam.io"]}"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::FeedMalformed);
        assert!(parse_feed_payload("not json").is_err());
    }

    #[test]
    fn test_non_string_entry_rejects_whole_payload() {
        let err = parse_feed_payload(r#"["scam.io", 42, "other.io"]"#).unwrap_err();
        assert_eq!(err.code, ErrorCode::FeedMalformed);
        assert!(err.message.contains("entry 1"));
    }
}
