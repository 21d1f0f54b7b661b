//! # CheckHim
//!
//! Async client for the CheckHim phone number verification API.
//!
//! The client sends a single `POST /api/verify` request per call and reports
//! whether the number is valid and which carrier serves it. Failures are
//! classified so callers can tell a rejected input, an unreachable service,
//! a cancelled call and a service-side rejection apart.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use checkhim::{CheckHim, VerifyRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), checkhim::CheckHimError> {
//!     let client = CheckHim::new("your_api_key")?;
//!
//!     let result = client.verify(&VerifyRequest::new("+5511984339000")).await?;
//!     println!("valid: {}, carrier: {}", result.valid, result.carrier);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Cancellation
//!
//! ```rust,no_run
//! use checkhim::{CheckHim, CheckHimError, VerifyContext, VerifyRequest};
//! use std::time::Duration;
//!
//! # async fn run(client: CheckHim) -> Result<(), CheckHimError> {
//! let ctx = VerifyContext::background().with_timeout(Duration::from_secs(5));
//!
//! match client
//!     .verify_with_context(&VerifyRequest::new("+244921204020"), &ctx)
//!     .await
//! {
//!     Ok(result) => println!("valid: {}", result.valid),
//!     Err(CheckHimError::Cancelled { reason }) => println!("gave up: {reason}"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `tracing` - OpenTelemetry tracing instrumentation (enabled by default)

pub mod client;
pub mod config;
pub mod context;
pub mod errors;
mod response;
pub mod types;
pub mod verifier;

// Re-export commonly used types at the crate root
pub use client::{CheckHim, CheckHimBuilder, USER_AGENT};
pub use config::{
    API_KEY_ENV, BASE_URL_ENV, Config, ConfigError, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
    TIMEOUT_ENV,
};
pub use context::VerifyContext;
pub use errors::{ApiError, CancelReason, CheckHimError, Result, RetryableError};
pub use types::{VerifyRequest, VerifyResponse};
pub use verifier::Verifier;

pub use tokio_util::sync::CancellationToken;
