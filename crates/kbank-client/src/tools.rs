//! Agent tool registry.

use reqwest::Method;
use tracing::{info, instrument};

use kbank_core::{Ack, Listing, Result, ToolDefinition};

use crate::transport::{segment, Body, CallOptions, Scope, Transport};

pub struct ToolsApi<'a> {
    scope: Scope<'a>,
}

impl<'a> ToolsApi<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        Self {
            scope: Scope::new(transport),
        }
    }

    pub fn with_options(self, options: CallOptions) -> Self {
        Self {
            scope: self.scope.with_options(options),
        }
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "tools", op = "list", result_count = tracing::field::Empty, dropped_count = tracing::field::Empty))]
    pub async fn list(&self) -> Result<Listing<ToolDefinition>> {
        self.scope.list(Method::GET, "/tools/", &[]).await
    }

    /// Register a custom or MCP tool.
    #[instrument(skip(self, tool), fields(subsystem = "client", component = "tools", op = "add", tool_id = %tool.id))]
    pub async fn add(&self, tool: &ToolDefinition) -> Result<ToolDefinition> {
        tool.validate_registration()?;
        let registered: ToolDefinition = self
            .scope
            .fetch(Method::POST, "/tools/", &[], Body::json(tool)?)
            .await?;
        info!(tool_type = ?registered.tool_type, "Tool registered");
        Ok(registered)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "tools", op = "toggle"))]
    pub async fn toggle(&self, tool_id: &str, enabled: bool) -> Result<ToolDefinition> {
        let route = format!("/tools/{}/toggle", segment(tool_id));
        self.scope
            .fetch(Method::POST, &route, &[("enabled", enabled.to_string())], Body::Empty)
            .await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "tools", op = "delete"))]
    pub async fn delete(&self, tool_id: &str) -> Result<Ack> {
        let route = format!("/tools/{}", segment(tool_id));
        self.scope.ack(Method::DELETE, &route, &[], Body::Empty).await
    }
}
