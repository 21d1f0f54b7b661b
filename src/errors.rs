//! Error types and traits for verification calls.

use crate::config::ConfigError;
use serde_json::{Map, Value};
use std::fmt::{self, Display, Formatter};
use std::time::Duration;
use thiserror::Error;

/// Trait for errors that can be classified as retryable or permanent.
///
/// The client itself never retries. This classification is for callers that
/// wrap it in their own retry policy.
///
/// # Examples
///
/// ```rust
/// use checkhim::{ApiError, CheckHimError, RetryableError};
///
/// let rate_limited = CheckHimError::Api(ApiError::new(429, "slow down"));
/// assert!(rate_limited.is_retryable());
///
/// let unauthorized = CheckHimError::Api(ApiError::new(401, "Invalid API key"));
/// assert!(!unauthorized.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error represents a transient failure
    /// that might succeed if the same call is made again.
    ///
    /// Examples: connection resets, rate limits, temporary service unavailability.
    fn is_retryable(&self) -> bool;
}

/// Structured error reported by the CheckHim service.
///
/// Also used for the local empty-number precondition, which is shaped like a
/// `400 invalid_request` response so callers can handle both the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable short code (e.g. `unauthorized`, `rate_limit_exceeded`).
    pub code: Option<String>,
    /// Additional service-defined details.
    pub details: Option<Map<String, Value>>,
}

impl ApiError {
    /// Create an error with a status and message and no code or details.
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            code: None,
            details: None,
        }
    }

    /// Attach a short code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach a details map.
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    /// Short code, or an empty string when the service sent none.
    pub fn code(&self) -> &str {
        self.code.as_deref().unwrap_or_default()
    }

    /// Look up a single entry of the details map.
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref()?.get(key)
    }

    pub(crate) fn phone_number_required() -> Self {
        Self::new(400, "phone number is required").with_code("invalid_request")
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.code.as_deref() {
            Some(code) if !code.is_empty() => write!(
                f,
                "checkhim: {} (code: {}, status: {})",
                self.message, code, self.status_code
            ),
            _ => write!(
                f,
                "checkhim: {} (status: {})",
                self.message, self.status_code
            ),
        }
    }
}

impl std::error::Error for ApiError {}

/// Why a verification call was abandoned before the service answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The cancellation token was cancelled.
    Cancelled,
    /// The context deadline elapsed.
    DeadlineExceeded {
        /// Time spent waiting before the deadline fired.
        elapsed: Duration,
    },
}

impl Display for CancelReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "context canceled"),
            Self::DeadlineExceeded { elapsed } => write!(
                f,
                "context deadline exceeded after {:.3}s",
                elapsed.as_secs_f64()
            ),
        }
    }
}

/// Main error type for CheckHim client operations.
#[derive(Debug, Error)]
pub enum CheckHimError {
    /// The request was rejected locally before any network activity.
    #[error("Invalid request: {0}")]
    InvalidRequest(#[source] ApiError),

    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Base URL and API path did not form a valid URL.
    #[error("Error building CheckHim request URL: {0}")]
    BuildRequestUrl(#[source] url::ParseError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failed to encode the request body.
    #[error("Failed to marshal request: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to send HTTP request.
    #[error("Failed to execute request: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// Failed to read the response body.
    #[error("Failed to read response body: {0}")]
    ReadBody(#[source] reqwest::Error),

    /// The caller's context was cancelled or its deadline elapsed.
    #[error("Verification cancelled: {reason}")]
    Cancelled { reason: CancelReason },

    /// The service answered with a non-success status.
    #[error("{0}")]
    Api(#[source] ApiError),

    /// A success response did not match the expected shape.
    #[error("Failed to unmarshal response: {source}")]
    Deserialize {
        #[source]
        source: serde_json::Error,
        /// Raw response body.
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, CheckHimError>;

impl CheckHimError {
    /// The structured error for service rejections and the local
    /// precondition failure.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::InvalidRequest(error) | Self::Api(error) => Some(error),
            _ => None,
        }
    }

    /// HTTP status code, when the error carries one.
    pub fn status_code(&self) -> Option<u16> {
        self.api_error().map(|e| e.status_code)
    }

    /// True if the request never completed at the protocol level.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::ReadBody(_))
    }

    /// True if the caller's context stopped the call.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// True if a success response could not be decoded.
    pub fn is_deserialize(&self) -> bool {
        matches!(self, Self::Deserialize { .. })
    }
}

impl RetryableError for CheckHimError {
    fn is_retryable(&self) -> bool {
        match self {
            // Retryable HTTP/network errors
            CheckHimError::Transport(_) | CheckHimError::ReadBody(_) => true,
            // Service errors: timeouts, rate limits, server-side failures
            CheckHimError::Api(error) => {
                matches!(error.status_code, 408 | 429) || error.status_code >= 500
            }
            // Non-retryable errors - caller input, configuration or protocol mismatch
            CheckHimError::InvalidRequest(_)
            | CheckHimError::BuildHttpClient(_)
            | CheckHimError::BuildRequestUrl(_)
            | CheckHimError::Config(_)
            | CheckHimError::Serialize(_)
            | CheckHimError::Cancelled { .. }
            | CheckHimError::Deserialize { .. } => false,
        }
    }
}
