//! CheckHim HTTP client.

use crate::config::{self, Config};
use crate::context::VerifyContext;
use crate::errors::{ApiError, CancelReason, CheckHimError, Result};
use crate::response::{self, WireVerifyRequest};
use crate::types::{VerifyRequest, VerifyResponse};
use reqwest::header;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

#[cfg(feature = "tracing")]
use opentelemetry::trace::Status;
#[cfg(feature = "tracing")]
use tracing::{Span, debug};
#[cfg(feature = "tracing")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("checkhim-rust-sdk/", env!("CARGO_PKG_VERSION"));

const VERIFY_PATH: &str = "api/verify";

/// CheckHim HTTP client.
///
/// Holds the API key, the endpoint and a pooled HTTP client. Cloning is
/// cheap and clones share the connection pool, so one instance can serve
/// many concurrent calls.
///
/// # Example
///
/// ```rust,no_run
/// use checkhim::{CheckHim, VerifyRequest};
/// use std::time::Duration;
///
/// # async fn run() -> checkhim::Result<()> {
/// let client = CheckHim::builder("your_api_key")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let result = client.verify(&VerifyRequest::new("+244921204020")).await?;
/// println!("valid: {}, carrier: {}", result.valid, result.carrier);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CheckHim {
    http_client: ClientWithMiddleware,
    api_key: SecretString,
    base_url: Url,
    verify_url: Url,
    timeout: Duration,
}

impl std::fmt::Debug for CheckHim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckHim")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Builder for configuring a [`CheckHim`].
pub struct CheckHimBuilder {
    api_key: String,
    config: Config,
}

impl CheckHimBuilder {
    /// Create a new builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            config: Config::default(),
        }
    }

    /// Set a custom API base URL.
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// Set the request timeout for the default HTTP client.
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set a custom HTTP client with middleware.
    pub fn http_client(mut self, client: ClientWithMiddleware) -> Self {
        self.config.http_client = Some(client);
        self
    }

    /// Replace all overrides at once.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the [`CheckHim`].
    pub fn build(self) -> Result<CheckHim> {
        let base_url = self
            .config
            .resolved_base_url()
            .map_err(CheckHimError::BuildRequestUrl)?;
        let verify_url = verify_url(&base_url)?;
        let timeout = self.config.resolved_timeout();

        let http_client = match self.config.http_client {
            Some(client) => client,
            None => {
                let client = reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(CheckHimError::BuildHttpClient)?;
                ClientBuilder::new(client).build()
            }
        };

        Ok(CheckHim {
            http_client,
            api_key: SecretString::from(self.api_key),
            base_url,
            verify_url,
            timeout,
        })
    }
}

fn verify_url(base_url: &Url) -> Result<Url> {
    let base = base_url.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/{VERIFY_PATH}")).map_err(CheckHimError::BuildRequestUrl)
}

impl CheckHim {
    /// Create a client with the default endpoint and timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder(api_key).build()
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(base_url.as_ref()).map_err(CheckHimError::BuildRequestUrl)?;
        Self::builder(api_key).base_url(url).build()
    }

    /// Create a client with configuration overrides.
    pub fn with_config(api_key: impl Into<String>, config: Config) -> Result<Self> {
        Self::builder(api_key).config(config).build()
    }

    /// Create a client from a list of overrides.
    ///
    /// Only the first config is used; the rest are ignored.
    pub fn with_configs<I>(api_key: impl Into<String>, configs: I) -> Result<Self>
    where
        I: IntoIterator<Item = Config>,
    {
        let config = configs.into_iter().next().unwrap_or_default();
        Self::with_config(api_key, config)
    }

    /// Create a client from `CHECKHIM_API_KEY`, `CHECKHIM_BASE_URL` and
    /// `CHECKHIM_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let api_key = config::api_key_from_lookup(|var| std::env::var(var).ok())?;
        Self::with_config(api_key, Config::from_env()?)
    }

    /// Create a builder for configuring the client.
    pub fn builder(api_key: impl Into<String>) -> CheckHimBuilder {
        CheckHimBuilder::new(api_key)
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Timeout applied to the default HTTP client.
    ///
    /// Not applied when a custom HTTP client was supplied.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Verify a phone number.
    ///
    /// Runs until the service answers, the transport fails or the client
    /// timeout fires. Use [`verify_with_context`](Self::verify_with_context)
    /// to bound the call with a cancellation token or deadline.
    pub async fn verify(&self, request: &VerifyRequest) -> Result<VerifyResponse> {
        self.verify_with_context(request, &VerifyContext::background())
            .await
    }

    /// Verify a phone number, giving up when `ctx` is cancelled or its
    /// deadline passes.
    ///
    /// # Errors
    /// - [`CheckHimError::InvalidRequest`] for an empty number (no request is sent),
    /// - [`CheckHimError::Cancelled`] when `ctx` stops the call first,
    /// - [`CheckHimError::Transport`] / [`CheckHimError::ReadBody`] when the
    ///   service could not be reached,
    /// - [`CheckHimError::Api`] for any status other than 200,
    /// - [`CheckHimError::Deserialize`] for a malformed 200 body.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "CheckHim::verify",
            skip_all,
            fields(
                status = tracing::field::Empty,
                valid = tracing::field::Empty
            )
        )
    )]
    pub async fn verify_with_context(
        &self,
        request: &VerifyRequest,
        ctx: &VerifyContext,
    ) -> Result<VerifyResponse> {
        if request.number().is_empty() {
            return Err(CheckHimError::InvalidRequest(
                ApiError::phone_number_required(),
            ));
        }

        let body = WireVerifyRequest::from(request).to_body()?;
        let started = Instant::now();

        let result = tokio::select! {
            biased;
            _ = ctx.cancellation_token().cancelled() => Err(CheckHimError::Cancelled {
                reason: CancelReason::Cancelled,
            }),
            _ = ctx.deadline_elapsed() => Err(CheckHimError::Cancelled {
                reason: CancelReason::DeadlineExceeded {
                    elapsed: started.elapsed(),
                },
            }),
            result = self.execute(body) => result,
        };

        #[cfg(feature = "tracing")]
        match &result {
            Ok(data) => {
                Span::current()
                    .record("valid", data.valid)
                    .set_status(Status::Ok);
            }
            Err(e) => debug!(error = %e, "Verification failed"),
        }

        result
    }

    /// Send the request body and decode the response.
    async fn execute(&self, body: Vec<u8>) -> Result<VerifyResponse> {
        #[cfg(feature = "tracing")]
        debug!(url = %self.verify_url, "Sending verification request");

        let response = self
            .http_client
            .post(self.verify_url.clone())
            .bearer_auth(self.api_key.expose_secret())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, USER_AGENT)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();

        #[cfg(feature = "tracing")]
        Span::current().record("status", status);

        let text = response.text().await.map_err(CheckHimError::ReadBody)?;

        response::from_status_and_body(status, text)
    }
}
