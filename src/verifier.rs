//! Verifier trait definition.

use crate::client::CheckHim;
use crate::context::VerifyContext;
use crate::errors::Result;
use crate::types::{VerifyRequest, VerifyResponse};
use std::future::Future;

/// Anything that can verify a phone number.
///
/// [`CheckHim`] is the real implementation. Code that depends on this trait
/// instead of the concrete client can swap in a fake for its own tests.
///
/// # Example
///
/// ```rust
/// use checkhim::{Result, Verifier, VerifyContext, VerifyRequest, VerifyResponse};
///
/// struct AlwaysValid;
///
/// impl Verifier for AlwaysValid {
///     async fn verify_with_context(
///         &self,
///         _request: &VerifyRequest,
///         _ctx: &VerifyContext,
///     ) -> Result<VerifyResponse> {
///         Ok(VerifyResponse {
///             carrier: "TEST".to_string(),
///             valid: true,
///         })
///     }
/// }
/// ```
pub trait Verifier: Send + Sync {
    /// Verify a number, stopping when `ctx` is cancelled or its deadline passes.
    fn verify_with_context(
        &self,
        request: &VerifyRequest,
        ctx: &VerifyContext,
    ) -> impl Future<Output = Result<VerifyResponse>> + Send;

    /// Verify a number without a cancellation context.
    fn verify(&self, request: &VerifyRequest) -> impl Future<Output = Result<VerifyResponse>> + Send {
        async move {
            let ctx = VerifyContext::background();
            self.verify_with_context(request, &ctx).await
        }
    }
}

impl Verifier for CheckHim {
    fn verify_with_context(
        &self,
        request: &VerifyRequest,
        ctx: &VerifyContext,
    ) -> impl Future<Output = Result<VerifyResponse>> + Send {
        CheckHim::verify_with_context(self, request, ctx)
    }
}
