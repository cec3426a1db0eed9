//! # kbank-client
//!
//! Typed access to the kbank knowledge-bank API.
//!
//! [`ApiClient`] binds one shared [`ApiConfig`] to an operation group per
//! domain. Each operation performs exactly one HTTP request, unwraps the
//! response envelope and returns the validated payload or a typed
//! [`kbank_core::Error`]. Nothing is retried or cached here.
//!
//! ```rust,no_run
//! use kbank_client::{ApiClient, ApiConfig, CallOptions};
//! use std::time::Duration;
//!
//! # async fn run() -> kbank_core::Result<()> {
//! let client = ApiClient::new(ApiConfig::from_env()?)?;
//! let workspaces = client.workspaces().list().await?;
//!
//! let outcome = client
//!     .search()
//!     .with_options(CallOptions::new().with_timeout(Duration::from_secs(5)))
//!     .global("rust ownership", None)
//!     .await?;
//! println!("{} workspaces, {} hits", workspaces.len(), outcome.results.len());
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod config;
pub mod documents;
pub mod search;
pub mod settings;
pub mod tasks;
pub mod tools;
mod transport;
pub mod workspaces;

use std::sync::Arc;

pub use chat::ChatApi;
pub use config::ApiConfig;
pub use documents::DocumentsApi;
pub use search::SearchApi;
pub use settings::SettingsApi;
pub use tasks::TasksApi;
pub use tools::ToolsApi;
pub use transport::CallOptions;
pub use workspaces::WorkspacesApi;

pub use tokio_util::sync::CancellationToken;

use kbank_core::Result;
use transport::Transport;

/// Entry point holding the shared configuration and HTTP connection pool.
///
/// Cloning is cheap; clones share the pool. Calls on any group may overlap
/// freely.
#[derive(Clone)]
pub struct ApiClient {
    transport: Transport,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        Self::with_shared_config(Arc::new(config))
    }

    /// Build from a configuration already shared elsewhere.
    pub fn with_shared_config(config: Arc<ApiConfig>) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env()?)
    }

    pub fn config(&self) -> &ApiConfig {
        self.transport.config()
    }

    pub fn workspaces(&self) -> WorkspacesApi<'_> {
        WorkspacesApi::new(&self.transport)
    }

    pub fn documents(&self) -> DocumentsApi<'_> {
        DocumentsApi::new(&self.transport)
    }

    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi::new(&self.transport)
    }

    pub fn tasks(&self) -> TasksApi<'_> {
        TasksApi::new(&self.transport)
    }

    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(&self.transport)
    }

    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(&self.transport)
    }

    pub fn tools(&self) -> ToolsApi<'_> {
        ToolsApi::new(&self.transport)
    }
}
