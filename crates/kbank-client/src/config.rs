//! Process-wide API configuration.
//!
//! An [`ApiConfig`] is built once at startup and shared read-only by every
//! operation group as an `Arc`.
//!
//! ```rust,no_run
//! use kbank_client::ApiConfig;
//!
//! // KBANK_API_URL / KBANK_API_TIMEOUT_SECS, with .env support
//! let config = ApiConfig::from_env().expect("invalid configuration");
//!
//! // Or explicitly
//! let config = ApiConfig::new("http://127.0.0.1:8000").expect("invalid base path");
//! ```

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use tracing::debug;
use url::Url;

use kbank_core::defaults::{API_BASE_URL, CONTENT_TYPE_JSON, ENV_API_TIMEOUT_SECS, ENV_API_URL};
use kbank_core::{Error, Result};

/// Base address, default headers and default timeout.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_path: String,
    default_headers: HeaderMap,
    default_timeout: Option<Duration>,
}

impl ApiConfig {
    /// Configuration for `base_path` with `Content-Type: application/json`
    /// and no timeout.
    pub fn new(base_path: &str) -> Result<Self> {
        let base_path = normalize_base_path(base_path)?;
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
        Ok(Self {
            base_path,
            default_headers,
            default_timeout: None,
        })
    }

    /// Load `.env`, then read `KBANK_API_URL` and `KBANK_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_path = lookup(ENV_API_URL).unwrap_or_else(|| API_BASE_URL.to_string());
        let mut config = Self::new(&base_path)?;

        if let Some(raw) = lookup(ENV_API_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                Error::Config(format!(
                    "{} must be a whole number of seconds, got: {}",
                    ENV_API_TIMEOUT_SECS, raw
                ))
            })?;
            if secs == 0 {
                return Err(Error::Config(format!("{} must be positive", ENV_API_TIMEOUT_SECS)));
            }
            config.default_timeout = Some(Duration::from_secs(secs));
        }

        debug!(
            base_path = %config.base_path,
            timeout_secs = config.default_timeout.map(|t| t.as_secs()),
            "API configuration loaded"
        );
        Ok(config)
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::Config(format!("Invalid header name {:?}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::Config(format!("Invalid value for header {}: {}", name, e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Timeout applied to calls that do not set their own.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }

    /// Absolute URL for a route such as `/workspaces`.
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_path, route)
    }
}

fn normalize_base_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| Error::Config(format!("Invalid API base path {:?}: {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(Error::Config(format!(
            "API base path must use http or https, got: {}",
            other
        ))),
    }
}
