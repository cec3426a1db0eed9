//! Document and vault operations.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::{debug, instrument};

use kbank_core::{
    check_name, Ack, Document, DocumentDetail, Listing, Result, TaskAccepted, UpdateDocumentWorkspaces,
};

use crate::transport::{segment, Body, CallOptions, Scope, Transport};

pub struct DocumentsApi<'a> {
    scope: Scope<'a>,
}

impl<'a> DocumentsApi<'a> {
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

    /// Documents assigned to one workspace.
    #[instrument(skip(self), fields(subsystem = "client", component = "documents", op = "list", result_count = tracing::field::Empty, dropped_count = tracing::field::Empty))]
    pub async fn list(&self, workspace_id: &str) -> Result<Listing<Document>> {
        self.scope
            .list(
                Method::GET,
                "/documents",
                &[("workspace_id", workspace_id.to_string())],
            )
            .await
    }

    /// Documents across every workspace.
    #[instrument(skip(self), fields(subsystem = "client", component = "documents", op = "list_all", result_count = tracing::field::Empty, dropped_count = tracing::field::Empty))]
    pub async fn list_all(&self) -> Result<Listing<Document>> {
        self.scope.list(Method::GET, "/documents-all", &[]).await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "documents", op = "vault", result_count = tracing::field::Empty, dropped_count = tracing::field::Empty))]
    pub async fn vault(&self) -> Result<Listing<Document>> {
        self.scope.list(Method::GET, "/vault", &[]).await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "documents", op = "get"))]
    pub async fn get(&self, name: &str) -> Result<DocumentDetail> {
        let route = format!("/documents/{}", segment(name));
        self.scope.fetch(Method::GET, &route, &[], Body::Empty).await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "documents", op = "delete"))]
    pub async fn delete(&self, name: &str, workspace_id: &str, vault_delete: bool) -> Result<Ack> {
        let route = format!("/documents/{}", segment(name));
        let query = [
            ("workspace_id", workspace_id.to_string()),
            ("vault_delete", vault_delete.to_string()),
        ];
        self.scope
            .ack(Method::DELETE, &route, &query, Body::Empty)
            .await
    }

    /// Upload a file for background ingestion. Rejected filenames never
    /// leave the process.
    #[instrument(skip(self, content), fields(subsystem = "client", component = "documents", op = "upload", size = content.len()))]
    pub async fn upload(
        &self,
        filename: &str,
        content: Vec<u8>,
        workspace_id: &str,
    ) -> Result<TaskAccepted> {
        check_name(filename)?;
        let form = Form::new().part("file", Part::bytes(content).file_name(filename.to_string()));
        let accepted: TaskAccepted = self
            .scope
            .fetch(
                Method::POST,
                "/upload",
                &[("workspace_id", workspace_id.to_string())],
                Body::Multipart(form),
            )
            .await?;
        debug!(task_id = %accepted.task_id, "Upload accepted");
        Ok(accepted)
    }

    /// Queue (re)indexing of a stored document.
    #[instrument(skip(self), fields(subsystem = "client", component = "documents", op = "index"))]
    pub async fn index(&self, name: &str, workspace_id: &str) -> Result<TaskAccepted> {
        let route = format!("/documents/{}/index", segment(name));
        self.scope
            .fetch(
                Method::POST,
                &route,
                &[("workspace_id", workspace_id.to_string())],
                Body::Empty,
            )
            .await
    }

    #[instrument(skip(self, request), fields(subsystem = "client", component = "documents", op = "update_workspaces", action = ?request.action))]
    pub async fn update_workspaces(&self, request: &UpdateDocumentWorkspaces) -> Result<TaskAccepted> {
        request.validate()?;
        self.scope
            .fetch(
                Method::POST,
                "/documents/update-workspaces",
                &[],
                Body::json(request)?,
            )
            .await
    }
}
