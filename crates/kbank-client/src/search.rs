//! Global search across workspaces, threads and documents.

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, instrument, Span};

use kbank_core::logging::{DROPPED_COUNT, RESULT_COUNT};
use kbank_core::{check_query, unwrap_envelope, Result, SearchAggregator, SearchOutcome, Strictness};

use crate::transport::{is_envelope, Body, CallOptions, Scope, Transport};

pub struct SearchApi<'a> {
    scope: Scope<'a>,
    aggregator: SearchAggregator,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self {
            scope: Scope::new(transport),
            aggregator: SearchAggregator::default(),
        }
    }

    pub fn with_options(self, options: CallOptions) -> Self {
        Self {
            scope: self.scope.with_options(options),
            ..self
        }
    }

    /// Drop-with-diagnostic is the default; `Strict` fails on any bad item.
    pub fn with_strictness(self, strictness: Strictness) -> Self {
        Self {
            aggregator: SearchAggregator::new(strictness),
            ..self
        }
    }

    /// Search every entity kind, optionally scoped to one workspace.
    ///
    /// The query is trimmed and must keep at least two characters. The
    /// route may answer with the combined object directly or inside an
    /// envelope; either way all three collections must be present.
    #[instrument(skip(self), fields(
        subsystem = "client",
        component = "search",
        op = "global",
        result_count = tracing::field::Empty,
        dropped_count = tracing::field::Empty,
    ))]
    pub async fn global(&self, query: &str, workspace_id: Option<&str>) -> Result<SearchOutcome> {
        let q = check_query(query)?;
        let mut params = vec![("q", q.to_string())];
        if let Some(id) = workspace_id {
            params.push(("workspace_id", id.to_string()));
        }

        let raw = self.scope.raw(Method::GET, "/search/", &params, Body::Empty).await?;
        let outcome = if is_envelope(&raw) {
            let combined = unwrap_envelope::<Value>(&raw)?;
            self.aggregator
                .aggregate(&combined)
                .map_err(|e| e.prefixed("data"))?
        } else {
            debug!("Bare search body");
            self.aggregator.aggregate(&raw)?
        };

        let span = Span::current();
        span.record(RESULT_COUNT, outcome.results.len());
        span.record(DROPPED_COUNT, outcome.diagnostics.len());
        debug!("Search complete");
        Ok(outcome)
    }
}
