//! # kbank-core
//!
//! Data contracts for the kbank knowledge-bank client.
//!
//! This crate defines the shape of every payload the backend returns, the
//! `{success, code, message, data}` envelope around them, the name checks
//! applied before a request is sent, and the aggregation of multi-entity
//! search results. It performs no I/O; `kbank-client` owns transport.

pub mod chat;
pub mod defaults;
pub mod documents;
pub mod envelope;
pub mod error;
pub mod listing;
pub mod logging;
pub mod names;
pub mod search;
pub mod settings;
pub mod tasks;
pub mod tools;
pub mod validation;
pub mod workspace;

// Re-export commonly used types at crate root
pub use chat::{Message, MessageHistory, Role, Source, Thread, ThreadList};
pub use documents::{Document, DocumentDetail, DocumentOp, DocumentStatus, UpdateDocumentWorkspaces};
pub use envelope::{failure_of, unwrap_ack, unwrap_envelope, Ack, Envelope};
pub use error::{Error, Result, TransportError};
pub use listing::{Listing, RowDiagnostic};
pub use names::{check_name, illegal_chars_found, is_name_valid, ILLEGAL_NAME_CHARS};
pub use search::{
    check_query, EntityKind, ItemDiagnostic, SearchAggregator, SearchOutcome, SearchResultItem,
    SearchResults, Strictness,
};
pub use settings::{is_provider_key, AppSettings, RagEngine, RetrievalMode, SettingsPatch};
pub use tasks::{Task, TaskAccepted, TaskList, TaskStatus};
pub use tools::{ToolDefinition, ToolType};
pub use validation::{validate, Presence, Schema, ValidationError, ValidationScope, Validator, Violation};
pub use workspace::{
    CreateWorkspaceInput, UpdateWorkspaceInput, Workspace, WorkspaceDetail, WorkspaceId,
    WorkspaceStats, WorkspaceStatus,
};
