//! Wire format for the verify endpoint.

use crate::errors::{ApiError, CheckHimError, Result};
use crate::types::{VerifyRequest, VerifyResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Channel discriminator sent with every request.
pub(crate) const REQUEST_TYPE: &str = "frontend";

/// Body actually sent to `/api/verify`.
#[derive(Debug, Serialize)]
pub(crate) struct WireVerifyRequest<'a> {
    number: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl<'a> From<&'a VerifyRequest> for WireVerifyRequest<'a> {
    fn from(request: &'a VerifyRequest) -> Self {
        Self {
            number: request.number(),
            kind: REQUEST_TYPE,
        }
    }
}

impl WireVerifyRequest<'_> {
    pub(crate) fn to_body(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(CheckHimError::Serialize)
    }
}

/// Error payload returned with non-200 statuses.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<Map<String, Value>>,
}

impl ErrorPayload {
    fn into_api_error(self, status_code: u16) -> ApiError {
        ApiError {
            status_code,
            message: self.error.unwrap_or_default(),
            code: self.code.filter(|code| !code.is_empty()),
            details: self.details,
        }
    }
}

/// Map a non-200 response to an [`ApiError`].
///
/// Every payload field is optional. Falls back to the raw body as the
/// message only when the body is not a JSON object of the expected shape.
pub(crate) fn parse_api_error(status_code: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ErrorPayload>(body) {
        Ok(payload) => payload.into_api_error(status_code),
        Err(_) => ApiError::new(status_code, body),
    }
}

/// Classify a completed response by status and decode its body.
pub(crate) fn from_status_and_body(status_code: u16, body: String) -> Result<VerifyResponse> {
    if status_code != 200 {
        return Err(CheckHimError::Api(parse_api_error(status_code, &body)));
    }

    serde_json::from_str::<VerifyResponse>(&body)
        .map_err(|source| CheckHimError::Deserialize { source, body })
}
