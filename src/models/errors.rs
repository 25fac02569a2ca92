//! Centralized Error Handling Module
//!
//! Every failure inside the service carries a unique error code so it can be
//! grepped in logs. Analysis entry points never surface these to callers:
//! provider failures are logged and degraded to "no data".
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - FEED_xxx: threat feed errors
//! - SECURITY_xxx: token security provider errors
//! - API_xxx: API errors
//! - CFG_xxx: configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Threat Feed Errors
    // ============================================
    /// Feed host unreachable
    FeedUnreachable,
    /// Feed returned a non-success HTTP status
    FeedBadStatus,
    /// Feed body is not a JSON array of strings
    FeedMalformed,

    // ============================================
    // Token Security Provider Errors
    // ============================================
    /// Provider unreachable
    SecurityUnreachable,
    /// Provider returned a non-success HTTP status
    SecurityBadStatus,
    /// Provider body could not be read as a report
    SecurityMalformed,

    // ============================================
    // Shared
    // ============================================
    /// External service timeout
    ExternalTimeout,

    // ============================================
    // API Errors
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Internal server error
    ApiInternalError,

    // ============================================
    // Configuration Errors
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    /// Unknown error
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeedUnreachable => "FEED_UNREACHABLE",
            Self::FeedBadStatus => "FEED_BAD_STATUS",
            Self::FeedMalformed => "FEED_MALFORMED",

            Self::SecurityUnreachable => "SECURITY_UNREACHABLE",
            Self::SecurityBadStatus => "SECURITY_BAD_STATUS",
            Self::SecurityMalformed => "SECURITY_MALFORMED",

            Self::ExternalTimeout => "EXTERNAL_TIMEOUT",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiInternalError => "API_INTERNAL_ERROR",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::ConfigInvalidValue => 400,
            Self::FeedUnreachable
            | Self::FeedBadStatus
            | Self::FeedMalformed
            | Self::SecurityUnreachable
            | Self::SecurityBadStatus
            | Self::SecurityMalformed => 502,
            Self::ExternalTimeout => 504,
            _ => 500,
        }
    }

    /// Whether the next scheduled run may succeed where this one failed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::FeedUnreachable
                | Self::FeedBadStatus
                | Self::SecurityUnreachable
                | Self::SecurityBadStatus
                | Self::ExternalTimeout
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    pub fn feed_bad_status(status: u16) -> Self {
        Self::new(ErrorCode::FeedBadStatus, format!("Threat feed returned HTTP {}", status))
    }

    pub fn feed_malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::FeedMalformed, msg)
    }

    pub fn security_bad_status(status: u16) -> Self {
        Self::new(
            ErrorCode::SecurityBadStatus,
            format!("Token security provider returned HTTP {}", status),
        )
    }

    pub fn security_malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::SecurityMalformed, msg)
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalTimeout, msg)
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }
}

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Unknown, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ErrorCode::ExternalTimeout, "Request timeout")
        } else if err.is_decode() {
            Self::with_source(ErrorCode::SecurityMalformed, "Response body could not be decoded", err)
        } else {
            Self::with_source(ErrorCode::SecurityUnreachable, "Request failed", err)
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::SecurityMalformed, "JSON parse error", err)
    }
}
