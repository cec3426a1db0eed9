//! Chat history and thread management. Streaming replies are not covered.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use kbank_core::{Ack, Listing, Message, MessageHistory, Result, Thread, ThreadList, ValidationError};

use crate::transport::{report_listing, segment, Body, CallOptions, Scope, Transport};

pub struct ChatApi<'a> {
    scope: Scope<'a>,
}

impl<'a> ChatApi<'a> {
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

    /// Messages of a thread, oldest first. Any invalid message fails the
    /// whole call so a conversation is never returned with gaps.
    #[instrument(skip(self), fields(subsystem = "client", component = "chat", op = "history"))]
    pub async fn history(&self, thread_id: &str) -> Result<Vec<Message>> {
        let route = format!("/chat/history/{}", segment(thread_id));
        let history: MessageHistory = self.scope.fetch(Method::GET, &route, &[], Body::Empty).await?;
        Ok(history.messages)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "chat", op = "threads", result_count = tracing::field::Empty, dropped_count = tracing::field::Empty))]
    pub async fn threads(&self, workspace_id: &str) -> Result<Listing<Thread>> {
        let list: ThreadList = self
            .scope
            .fetch(
                Method::GET,
                "/chat/threads",
                &[("workspace_id", workspace_id.to_string())],
                Body::Empty,
            )
            .await?;
        report_listing(&list.threads);
        Ok(list.threads)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "chat", op = "rename_thread"))]
    pub async fn rename_thread(&self, thread_id: &str, title: &str) -> Result<Ack> {
        if title.trim().is_empty() {
            let err = ValidationError::single("title", "non-empty string", Some(json!(title)));
            return Err(err.into());
        }
        let route = format!("/chat/threads/{}/title", segment(thread_id));
        self.scope
            .ack(Method::PATCH, &route, &[], Body::Json(json!({ "title": title })))
            .await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "chat", op = "delete_thread"))]
    pub async fn delete_thread(&self, thread_id: &str) -> Result<Ack> {
        let route = format!("/chat/threads/{}", segment(thread_id));
        self.scope.ack(Method::DELETE, &route, &[], Body::Empty).await
    }
}
