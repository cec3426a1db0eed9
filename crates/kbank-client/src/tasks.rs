//! Background task polling.

use reqwest::Method;
use tracing::instrument;

use kbank_core::{Listing, Result, Task, TaskList};

use crate::transport::{report_listing, segment, Body, CallOptions, Scope, Transport};

pub struct TasksApi<'a> {
    scope: Scope<'a>,
}

impl<'a> TasksApi<'a> {
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

    /// Tasks, optionally filtered by type (e.g. `ingestion`, `indexing`).
    ///
    /// The task routes may answer without an envelope; both forms are
    /// accepted.
    #[instrument(skip(self), fields(subsystem = "client", component = "tasks", op = "list", result_count = tracing::field::Empty, dropped_count = tracing::field::Empty))]
    pub async fn list(&self, task_type: Option<&str>) -> Result<Listing<Task>> {
        let query: Vec<(&str, String)> = task_type
            .map(|t| vec![("type", t.to_string())])
            .unwrap_or_default();
        let list: TaskList = self
            .scope
            .fetch_either(Method::GET, "/tasks/", &query, Body::Empty)
            .await?;
        report_listing(&list.tasks);
        Ok(list.tasks)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "tasks", op = "get"))]
    pub async fn get(&self, task_id: &str) -> Result<Task> {
        let route = format!("/tasks/{}", segment(task_id));
        self.scope
            .fetch_either(Method::GET, &route, &[], Body::Empty)
            .await
    }
}
