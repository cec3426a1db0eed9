//! Global and per-workspace settings.

use reqwest::Method;
use tracing::{info, instrument};

use kbank_core::{AppSettings, Result, SettingsPatch};

use crate::transport::{Body, CallOptions, Scope, Transport};

pub struct SettingsApi<'a> {
    scope: Scope<'a>,
}

impl<'a> SettingsApi<'a> {
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

    /// Effective settings; workspace overrides apply when `workspace_id` is set.
    #[instrument(skip(self), fields(subsystem = "client", component = "settings", op = "get"))]
    pub async fn get(&self, workspace_id: Option<&str>) -> Result<AppSettings> {
        self.scope
            .fetch(Method::GET, "/settings/", &scope_query(workspace_id), Body::Empty)
            .await
    }

    #[instrument(skip(self, patch), fields(subsystem = "client", component = "settings", op = "update"))]
    pub async fn update(&self, patch: &SettingsPatch, workspace_id: Option<&str>) -> Result<AppSettings> {
        patch.validate()?;
        if patch.touches_provider() {
            info!(
                keys = ?patch.keys().collect::<Vec<_>>(),
                "Updating provider configuration"
            );
        }
        self.scope
            .fetch(
                Method::PATCH,
                "/settings/",
                &scope_query(workspace_id),
                Body::json(patch)?,
            )
            .await
    }
}

fn scope_query(workspace_id: Option<&str>) -> Vec<(&'static str, String)> {
    workspace_id
        .map(|id| vec![("workspace_id", id.to_string())])
        .unwrap_or_default()
}
