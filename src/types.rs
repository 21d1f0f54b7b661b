//! Request and response types for phone number verification.

use serde::{Deserialize, Serialize};

// =============================================================================
// VerifyRequest
// =============================================================================

/// Phone number verification request.
///
/// The number should be in international format with a leading `+` and the
/// country code (e.g. `"+5511984339000"`). Only emptiness is checked locally;
/// everything else is up to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    /// Phone number to verify.
    pub number: String,
}

impl VerifyRequest {
    /// Create a new request for the given number.
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
        }
    }

    /// Get the number as a string slice.
    pub fn number(&self) -> &str {
        &self.number
    }
}

impl From<String> for VerifyRequest {
    fn from(number: String) -> Self {
        Self { number }
    }
}

impl From<&str> for VerifyRequest {
    fn from(number: &str) -> Self {
        Self::new(number)
    }
}

// =============================================================================
// VerifyResponse
// =============================================================================

/// Result of a successful verification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Name of the mobile carrier. Empty when unknown or the number is invalid.
    #[serde(default)]
    pub carrier: String,

    /// Whether the phone number is valid and active. Absent means `false`.
    #[serde(default)]
    pub valid: bool,
}
