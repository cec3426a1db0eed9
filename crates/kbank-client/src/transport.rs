//! HTTP transport shared by every operation group.
//!
//! One [`Transport`] call is one network request. The response body is
//! decoded to JSON and handed back; envelope unwrapping and schema
//! validation happen in the caller. No call is ever retried here.

use reqwest::multipart::Form;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn, Span};

use kbank_core::defaults::SLOW_CALL_MS;
use kbank_core::logging::{DROPPED_COUNT, DURATION_MS, RESULT_COUNT, STATUS};
use kbank_core::{
    failure_of, unwrap_ack, unwrap_envelope, validate, Ack, Error, Listing, Result, Schema,
    TransportError,
};

use crate::config::ApiConfig;

/// Per-call options: a timeout overriding the configured default, and a
/// token the caller can cancel to abort the call.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

/// Request body of a single call.
pub(crate) enum Body {
    Empty,
    Json(Value),
    Multipart(Form),
}

impl Body {
    pub(crate) fn json<T: Serialize>(payload: &T) -> Result<Self> {
        serde_json::to_value(payload).map(Body::Json).map_err(|e| {
            TransportError::Request(format!("Failed to encode request body: {}", e)).into()
        })
    }
}

/// Percent-encode one path segment.
pub(crate) fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

#[derive(Clone)]
pub(crate) struct Transport {
    client: Client,
    config: Arc<ApiConfig>,
}

impl Transport {
    pub(crate) fn new(config: Arc<ApiConfig>) -> Result<Self> {
        let client = Client::builder()
            .default_headers(config.default_headers().clone())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub(crate) fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Perform one request and return the decoded JSON body.
    ///
    /// Non-2xx responses become [`Error::Application`] when the body is a
    /// failure envelope and [`TransportError::Status`] otherwise.
    #[instrument(skip(self, query, body, opts), fields(
        method = %method,
        endpoint = %route,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    ))]
    pub(crate) async fn call(
        &self,
        method: Method,
        route: &str,
        query: &[(&str, String)],
        body: Body,
        opts: &CallOptions,
    ) -> Result<Value> {
        if opts.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut request = self.client.request(method, self.config.url(route));
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(&value),
            Body::Multipart(form) => request.multipart(form),
        };
        if let Some(timeout) = opts.timeout.or(self.config.default_timeout()) {
            request = request.timeout(timeout);
        }

        let start = Instant::now();
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, Error>((status, bytes))
        };

        let (status, bytes) = match &opts.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Call cancelled while in flight");
                    return Err(Error::Cancelled);
                }
                result = exchange => result?,
            },
            None => exchange.await?,
        };

        // Validation must not start after an abort.
        if opts.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let span = Span::current();
        span.record(STATUS, status.as_u16());
        span.record(DURATION_MS, duration_ms);
        trace!(body_len = bytes.len(), "Response received");
        if duration_ms > SLOW_CALL_MS {
            warn!(slow = true, duration_ms, "Slow API call");
        }

        decode(status, &bytes)
    }
}

/// A transport bound to one set of call options. Every operation group
/// holds one.
#[derive(Clone)]
pub(crate) struct Scope<'a> {
    transport: &'a Transport,
    options: CallOptions,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self {
            transport,
            options: CallOptions::default(),
        }
    }

    pub(crate) fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }

    /// Decoded body without envelope handling.
    pub(crate) async fn raw(
        &self,
        method: Method,
        route: &str,
        query: &[(&str, String)],
        body: Body,
    ) -> Result<Value> {
        self.transport
            .call(method, route, query, body, &self.options)
            .await
    }

    /// Unwrap the envelope and validate its payload as `T`.
    pub(crate) async fn fetch<T: Schema>(
        &self,
        method: Method,
        route: &str,
        query: &[(&str, String)],
        body: Body,
    ) -> Result<T> {
        let raw = self.raw(method, route, query, body).await?;
        unwrap_envelope(&raw)
    }

    /// Like [`Scope::fetch`], but a body that is not an envelope is
    /// validated directly as `T`.
    pub(crate) async fn fetch_either<T: Schema>(
        &self,
        method: Method,
        route: &str,
        query: &[(&str, String)],
        body: Body,
    ) -> Result<T> {
        let raw = self.raw(method, route, query, body).await?;
        if is_envelope(&raw) {
            unwrap_envelope(&raw)
        } else {
            debug!("Bare response body");
            Ok(validate(&raw)?)
        }
    }

    /// Fetch an enveloped array, keeping the rows that validate.
    pub(crate) async fn list<T: Schema>(
        &self,
        method: Method,
        route: &str,
        query: &[(&str, String)],
    ) -> Result<Listing<T>> {
        let listing = self.fetch(method, route, query, Body::Empty).await?;
        report_listing(&listing);
        Ok(listing)
    }

    /// Unwrap an envelope whose payload is not needed.
    pub(crate) async fn ack(
        &self,
        method: Method,
        route: &str,
        query: &[(&str, String)],
        body: Body,
    ) -> Result<Ack> {
        let raw = self.raw(method, route, query, body).await?;
        unwrap_ack(&raw)
    }
}

/// Whether a decoded body is an envelope rather than a bare payload.
///
/// `message` alone does not count: bare task records carry one.
pub(crate) fn is_envelope(raw: &Value) -> bool {
    ["success", "code", "data"].iter().any(|key| raw.get(key).is_some())
}

/// Record listing counts on the current span and warn once per dropped row.
pub(crate) fn report_listing<T>(listing: &Listing<T>) {
    let span = Span::current();
    span.record(RESULT_COUNT, listing.len());
    span.record(DROPPED_COUNT, listing.diagnostics.len());
    for row in &listing.diagnostics {
        warn!(index = row.index, error = %row.error, "Dropped invalid row");
    }
}

fn decode(status: StatusCode, bytes: &[u8]) -> Result<Value> {
    let parsed = serde_json::from_slice::<Value>(bytes);
    if status.is_success() {
        return parsed.map_err(|e| Error::Transport(e.into()));
    }
    if let Ok(body) = &parsed {
        if let Some(err) = failure_of(body) {
            debug!(status = status.as_u16(), code = err.code(), "Failure envelope on error status");
            return Err(err);
        }
    }
    warn!(status = status.as_u16(), "Error status without a failure envelope");
    Err(TransportError::Status(status.as_u16()).into())
}
