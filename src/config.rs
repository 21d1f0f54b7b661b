//! Client configuration and defaults.

use reqwest_middleware::ClientWithMiddleware;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default CheckHim API base URL.
pub const DEFAULT_BASE_URL: &str = "http://api.checkhim.tech";

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "CHECKHIM_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "CHECKHIM_BASE_URL";

/// Environment variable overriding the timeout, in seconds.
pub const TIMEOUT_ENV: &str = "CHECKHIM_TIMEOUT_SECS";

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set or empty.
    #[error("Environment variable {var} is not set")]
    MissingVar { var: &'static str },

    /// The base URL variable is not a valid URL.
    #[error("Invalid URL in {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    /// The timeout variable is not a non-negative number of seconds.
    #[error("Invalid timeout in {var}: '{value}'")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Optional overrides for a [`CheckHim`](crate::CheckHim) client.
///
/// Every field is independent: unset fields fall back to their defaults.
/// A zero timeout counts as unset. When `http_client` is set, `timeout` is
/// not applied to it.
///
/// # Example
///
/// ```rust
/// use checkhim::Config;
/// use std::time::Duration;
///
/// let config = Config::default().with_timeout(Duration::from_secs(60));
///
/// assert_eq!(config.timeout, Some(Duration::from_secs(60)));
/// assert!(config.base_url.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Base URL for the CheckHim API.
    pub base_url: Option<Url>,
    /// Timeout for HTTP requests.
    pub timeout: Option<Duration>,
    /// Custom HTTP client with middleware.
    pub http_client: Option<ClientWithMiddleware>,
}

impl Config {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set a custom request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom HTTP client.
    pub fn with_http_client(mut self, client: ClientWithMiddleware) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Effective base URL.
    pub(crate) fn resolved_base_url(&self) -> Result<Url, url::ParseError> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => Url::parse(DEFAULT_BASE_URL),
        }
    }

    /// Effective timeout. Zero is treated as unset.
    pub(crate) fn resolved_timeout(&self) -> Duration {
        self.timeout
            .filter(|timeout| !timeout.is_zero())
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Load base URL and timeout overrides from the process environment.
    ///
    /// Reads [`BASE_URL_ENV`] and [`TIMEOUT_ENV`]; both are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load overrides through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = non_empty(&lookup, BASE_URL_ENV) {
            let url = Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
                var: BASE_URL_ENV,
                source,
            })?;
            config.base_url = Some(url);
        }

        if let Some(raw) = non_empty(&lookup, TIMEOUT_ENV) {
            let timeout = raw
                .parse::<f64>()
                .ok()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                .ok_or(ConfigError::InvalidTimeout {
                    var: TIMEOUT_ENV,
                    value: raw,
                })?;
            config.timeout = Some(timeout);
        }

        Ok(config)
    }
}

/// Read the API key through a variable lookup.
pub(crate) fn api_key_from_lookup<F>(lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(&lookup, API_KEY_ENV).ok_or(ConfigError::MissingVar { var: API_KEY_ENV })
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.base_url.is_none());
        assert!(config.timeout.is_none());
        assert!(config.http_client.is_none());
        assert_eq!(config.resolved_timeout(), DEFAULT_TIMEOUT);
        assert_eq!(
            config.resolved_base_url().unwrap().as_str(),
            "http://api.checkhim.tech/"
        );
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let config = Config::default().with_timeout(Duration::ZERO);
        assert_eq!(config.resolved_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_overrides_are_independent() {
        let url = Url::parse("https://custom.api.com").unwrap();
        let config = Config::default().with_base_url(url.clone());
        assert_eq!(config.resolved_base_url().unwrap(), url);
        assert_eq!(config.resolved_timeout(), DEFAULT_TIMEOUT);

        let config = Config::default().with_timeout(Duration::from_secs(60));
        assert_eq!(
            config.resolved_base_url().unwrap().as_str(),
            "http://api.checkhim.tech/"
        );
        assert_eq!(config.resolved_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_from_lookup_empty_environment() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert!(config.base_url.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_from_lookup_reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (BASE_URL_ENV, "https://staging.checkhim.tech"),
            (TIMEOUT_ENV, "2.5"),
        ]))
        .unwrap();

        assert_eq!(
            config.base_url.unwrap().as_str(),
            "https://staging.checkhim.tech/"
        );
        assert_eq!(config.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_from_lookup_rejects_bad_url() {
        let err = Config::from_lookup(lookup_from(&[(BASE_URL_ENV, "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { var, .. } if var == BASE_URL_ENV));
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        for value in ["soon", "-1"] {
            let err = Config::from_lookup(lookup_from(&[(TIMEOUT_ENV, value)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidTimeout { .. }),
                "'{}' should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_api_key_lookup() {
        assert_eq!(
            api_key_from_lookup(lookup_from(&[(API_KEY_ENV, " key-123 ")])).unwrap(),
            "key-123"
        );
        assert!(matches!(
            api_key_from_lookup(lookup_from(&[(API_KEY_ENV, "   ")])),
            Err(ConfigError::MissingVar { .. })
        ));
        assert!(api_key_from_lookup(lookup_from(&[])).is_err());
    }
}
