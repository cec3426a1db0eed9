//! Workspace entities and the inputs used to create or update them.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;

use crate::chat::Thread;
use crate::defaults::{
    DEFAULT_EMBEDDING_DIM, WORKSPACE_DESCRIPTION_MAX_LEN, WORKSPACE_ID_LEN, WORKSPACE_NAME_MAX_LEN,
};
use crate::documents::Document;
use crate::error::Result;
use crate::listing::Listing;
use crate::names::check_name;
use crate::validation::{validate, Presence, Schema, ValidationError, Validator};

/// Word characters, whitespace, dots and hyphens.
static WORKSPACE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\s.\-]+$").expect("workspace name pattern is valid")
});

const WORKSPACE_NAME_CHARSET: &str = "only letters, numbers, underscores, spaces, dots and hyphens";

// =============================================================================
// IDENTIFIER
// =============================================================================

/// Opaque workspace identifier of exactly eight characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Check the length rule; the content is otherwise opaque.
    pub fn new(id: &str) -> std::result::Result<Self, ValidationError> {
        validate::<WorkspaceId>(&Value::String(id.to_string()))
            .map_err(|e| e.prefixed("id"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Schema for WorkspaceId {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        v.string_len(value, WORKSPACE_ID_LEN, Some(WORKSPACE_ID_LEN))
            .map(WorkspaceId)
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WorkspaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// WORKSPACE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceStatus {
    #[default]
    Active,
    Archived,
}

impl Schema for WorkspaceStatus {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        match v.one_of(value, &["active", "archived"])? {
            "active" => Some(WorkspaceStatus::Active),
            _ => Some(WorkspaceStatus::Archived),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WorkspaceStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_count: Option<i64>,
}

impl Schema for WorkspaceStats {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let thread_count = v.optional(obj, "thread_count", Validator::integer);
        let doc_count = v.optional(obj, "doc_count", Validator::integer);
        Some(WorkspaceStats {
            thread_count: thread_count?,
            doc_count: doc_count?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub embedding_dim: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag_config_hash: Option<String>,
    pub status: WorkspaceStatus,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub description: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub stats: Presence<WorkspaceStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Schema for Workspace {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let id = v.required(obj, "id", WorkspaceId::parse);
        let name = v.required(obj, "name", Validator::non_empty_string);
        let embedding_dim = v.required(obj, "embedding_dim", Validator::positive_u32);
        let rag_config_hash = v.optional(obj, "rag_config_hash", Validator::string);
        let status = v.defaulted(obj, "status", WorkspaceStatus::Active, WorkspaceStatus::parse);
        let description = v.nullable(obj, "description", Validator::string);
        let stats = v.nullable(obj, "stats", WorkspaceStats::parse);
        let created_at = v.optional(obj, "created_at", Validator::string);
        let updated_at = v.optional(obj, "updated_at", Validator::string);
        Some(Workspace {
            id: id?,
            name: name?,
            embedding_dim: embedding_dim?,
            rag_config_hash: rag_config_hash?,
            status: status?,
            description: description?,
            stats: stats?,
            created_at: created_at?,
            updated_at: updated_at?,
        })
    }
}

/// Workspace plus its threads, documents and settings overrides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceDetail {
    #[serde(flatten)]
    pub workspace: Workspace,
    pub threads: Listing<Thread>,
    pub documents: Listing<Document>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub settings: Presence<Map<String, Value>>,
}

impl Schema for WorkspaceDetail {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let workspace = Workspace::parse(v, value);
        let obj = value.as_object()?;
        let threads = v.defaulted(obj, "threads", Listing::default(), Listing::<Thread>::parse);
        let documents = v.defaulted(obj, "documents", Listing::default(), Listing::<Document>::parse);
        let settings = v.nullable(obj, "settings", Validator::record);
        Some(WorkspaceDetail {
            workspace: workspace?,
            threads: threads?,
            documents: documents?,
            settings: settings?,
        })
    }
}

// =============================================================================
// INPUTS
// =============================================================================

fn workspace_name(v: &mut Validator, value: &Value) -> Option<String> {
    let name = v.string_len(value, 1, Some(WORKSPACE_NAME_MAX_LEN))?;
    v.matching(&Value::String(name), &WORKSPACE_NAME_RE, WORKSPACE_NAME_CHARSET)
}

fn workspace_description(v: &mut Validator, value: &Value) -> Option<String> {
    v.string_len(value, 0, Some(WORKSPACE_DESCRIPTION_MAX_LEN))
}

/// Request body for creating a workspace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWorkspaceInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub embedding_dim: u32,
}

impl CreateWorkspaceInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_embedding_dim(mut self, dim: u32) -> Self {
        self.embedding_dim = dim;
        self
    }

    fn to_json(&self) -> Value {
        let mut value = json!({"name": self.name, "embedding_dim": self.embedding_dim});
        if let Some(ref description) = self.description {
            value["description"] = json!(description);
        }
        value
    }

    /// Schema constraints only.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validate::<CreateWorkspaceInput>(&self.to_json()).map(|_| ())
    }

    /// Forbidden characters first, then schema constraints.
    pub fn precheck(&self) -> Result<()> {
        check_name(&self.name)?;
        self.validate()?;
        Ok(())
    }
}

impl Schema for CreateWorkspaceInput {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let name = v.required(obj, "name", workspace_name);
        let description = v.optional(obj, "description", workspace_description);
        let embedding_dim = v.defaulted(
            obj,
            "embedding_dim",
            DEFAULT_EMBEDDING_DIM,
            Validator::positive_u32,
        );
        Some(CreateWorkspaceInput {
            name: name?,
            description: description?,
            embedding_dim: embedding_dim?,
        })
    }
}

/// Partial update; at least one field must be set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UpdateWorkspaceInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateWorkspaceInput {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    pub fn describe(description: impl Into<String>) -> Self {
        Self {
            name: None,
            description: Some(description.into()),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        let mut v = Validator::new();
        if self.name.is_none() && self.description.is_none() {
            v.fail("at least one of name, description", None);
        }
        if let Some(ref name) = self.name {
            v.at("name", |v| workspace_name(v, &Value::String(name.clone())));
        }
        if let Some(ref description) = self.description {
            v.at("description", |v| {
                workspace_description(v, &Value::String(description.clone()))
            });
        }
        v.finish(Some(()))
    }

    pub fn precheck(&self) -> Result<()> {
        if let Some(ref name) = self.name {
            check_name(name)?;
        }
        self.validate()?;
        Ok(())
    }
}
