//! Workspace operations.

use reqwest::Method;
use serde_json::json;
use tracing::{info, instrument};

use kbank_core::defaults::WORKSPACE_ID_LEN;
use kbank_core::{
    Ack, CreateWorkspaceInput, Listing, Result, UpdateWorkspaceInput, ValidationError, Workspace,
    WorkspaceDetail, WorkspaceId,
};

use crate::transport::{report_listing, segment, Body, CallOptions, Scope, Transport};

pub struct WorkspacesApi<'a> {
    scope: Scope<'a>,
}

impl<'a> WorkspacesApi<'a> {
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

    /// Every workspace the backend returns. Rows that fail validation (the
    /// seeded `default` workspace, for one) are left out and listed in
    /// [`Listing::diagnostics`].
    #[instrument(skip(self), fields(subsystem = "client", component = "workspaces", op = "list", result_count = tracing::field::Empty, dropped_count = tracing::field::Empty))]
    pub async fn list(&self) -> Result<Listing<Workspace>> {
        self.scope.list(Method::GET, "/workspaces", &[]).await
    }

    /// Name and schema checks run before anything is sent.
    #[instrument(skip(self, input), fields(subsystem = "client", component = "workspaces", op = "create"))]
    pub async fn create(&self, input: &CreateWorkspaceInput) -> Result<Workspace> {
        input.precheck()?;
        let workspace: Workspace = self
            .scope
            .fetch(Method::POST, "/workspaces", &[], Body::json(input)?)
            .await?;
        info!(workspace_id = %workspace.id, "Workspace created");
        Ok(workspace)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "workspaces", op = "details"))]
    pub async fn details(&self, id: &str) -> Result<WorkspaceDetail> {
        let id = WorkspaceId::new(id)?;
        let route = format!("/workspaces/{}/details", segment(id.as_str()));
        let detail: WorkspaceDetail = self.scope.fetch(Method::GET, &route, &[], Body::Empty).await?;
        report_listing(&detail.threads);
        report_listing(&detail.documents);
        Ok(detail)
    }

    #[instrument(skip(self, input), fields(subsystem = "client", component = "workspaces", op = "update"))]
    pub async fn update(&self, id: &str, input: &UpdateWorkspaceInput) -> Result<Workspace> {
        let id = WorkspaceId::new(id)?;
        input.precheck()?;
        let route = format!("/workspaces/{}", segment(id.as_str()));
        self.scope
            .fetch(Method::PATCH, &route, &[], Body::json(input)?)
            .await
    }

    /// Delete a workspace. With `vault_delete` its documents are removed
    /// from the vault too instead of being kept unassigned.
    #[instrument(skip(self), fields(subsystem = "client", component = "workspaces", op = "delete"))]
    pub async fn delete(&self, id: &str, vault_delete: bool) -> Result<Ack> {
        let id = WorkspaceId::new(id)?;
        let route = format!("/workspaces/{}", segment(id.as_str()));
        self.scope
            .ack(
                Method::DELETE,
                &route,
                &[("vault_delete", vault_delete.to_string())],
                Body::Empty,
            )
            .await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "workspaces", op = "share_document"))]
    pub async fn share_document(
        &self,
        id: &str,
        source_name: &str,
        target_workspace_id: &str,
    ) -> Result<Ack> {
        let id = WorkspaceId::new(id)?;
        let target = WorkspaceId::new(target_workspace_id)
            .map_err(|_| target_id_error(target_workspace_id))?;
        if source_name.is_empty() {
            let err = ValidationError::single("source_name", "non-empty string", Some(json!(source_name)));
            return Err(err.into());
        }
        let route = format!("/workspaces/{}/share-document", segment(id.as_str()));
        let body = json!({
            "source_name": source_name,
            "target_workspace_id": target.as_str(),
        });
        self.scope
            .ack(Method::POST, &route, &[], Body::Json(body))
            .await
    }
}

fn target_id_error(raw: &str) -> ValidationError {
    ValidationError::single(
        "target_workspace_id",
        format!("exactly {} characters", WORKSPACE_ID_LEN),
        Some(json!(raw)),
    )
}
