//! Documents stored in workspaces and the vault.

use serde::Serialize;
use serde_json::{json, Value};

use crate::validation::{validate, Presence, Schema, ValidationError, Validator};

/// Known ingestion states. The wire value stays an open string because
/// backends add states over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Uploaded,
    Indexing,
    Indexed,
    Failed,
}

impl DocumentStatus {
    pub fn from_wire(status: &str) -> Option<Self> {
        match status {
            "uploaded" => Some(DocumentStatus::Uploaded),
            "indexing" => Some(DocumentStatus::Indexing),
            "indexed" => Some(DocumentStatus::Indexed),
            "failed" => Some(DocumentStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub workspace_id: String,
    pub content_hash: String,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub rag_config_hash: Presence<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub chunks: Presence<i64>,
    pub shared_with: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_shared: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
}

impl Document {
    pub fn known_status(&self) -> Option<DocumentStatus> {
        DocumentStatus::from_wire(&self.status)
    }
}

impl Schema for Document {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let id = v.required(obj, "id", Validator::string);
        let filename = v.required(obj, "filename", Validator::string);
        let workspace_id = v.required(obj, "workspace_id", Validator::string);
        let content_hash = v.required(obj, "content_hash", Validator::string);
        let rag_config_hash = v.nullable(obj, "rag_config_hash", Validator::string);
        let status = v.required(obj, "status", Validator::string);
        let chunks = v.nullable(obj, "chunks", Validator::integer);
        let shared_with = v.defaulted(obj, "shared_with", Vec::new(), Validator::string_array);
        let created_at = v.required(obj, "created_at", Validator::string);
        let updated_at = v.required(obj, "updated_at", Validator::string);
        let is_shared = v.optional(obj, "is_shared", Validator::boolean);
        let workspace_name = v.optional(obj, "workspace_name", Validator::string);
        Some(Document {
            id: id?,
            filename: filename?,
            workspace_id: workspace_id?,
            content_hash: content_hash?,
            rag_config_hash: rag_config_hash?,
            status: status?,
            chunks: chunks?,
            shared_with: shared_with?,
            created_at: created_at?,
            updated_at: updated_at?,
            is_shared: is_shared?,
            workspace_name: workspace_name?,
        })
    }
}

/// A single document with its extracted text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentDetail {
    #[serde(flatten)]
    pub document: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Schema for DocumentDetail {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let document = Document::parse(v, value);
        let obj = value.as_object()?;
        let content = v.optional(obj, "content", Validator::string);
        Some(DocumentDetail {
            document: document?,
            content: content?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentOp {
    Move,
    Link,
    Share,
    Unshare,
}

impl Schema for DocumentOp {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        match v.one_of(value, &["move", "link", "share", "unshare"])? {
            "move" => Some(DocumentOp::Move),
            "link" => Some(DocumentOp::Link),
            "share" => Some(DocumentOp::Share),
            _ => Some(DocumentOp::Unshare),
        }
    }
}

/// Request body for moving, linking or sharing a document across workspaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateDocumentWorkspaces {
    pub name: String,
    pub target_workspace_id: String,
    pub action: DocumentOp,
    pub force_reindex: bool,
}

impl UpdateDocumentWorkspaces {
    pub fn new(name: impl Into<String>, target_workspace_id: impl Into<String>, action: DocumentOp) -> Self {
        Self {
            name: name.into(),
            target_workspace_id: target_workspace_id.into(),
            action,
            force_reindex: false,
        }
    }

    pub fn force_reindex(mut self) -> Self {
        self.force_reindex = true;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let raw = json!({
            "name": self.name,
            "target_workspace_id": self.target_workspace_id,
            "action": self.action,
            "force_reindex": self.force_reindex,
        });
        validate::<UpdateDocumentWorkspaces>(&raw).map(|_| ())
    }
}

impl Schema for UpdateDocumentWorkspaces {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let name = v.required(obj, "name", Validator::non_empty_string);
        let target = v.required(obj, "target_workspace_id", Validator::string);
        let action = v.required(obj, "action", DocumentOp::parse);
        let force_reindex = v.defaulted(obj, "force_reindex", false, Validator::boolean);
        Some(UpdateDocumentWorkspaces {
            name: name?,
            target_workspace_id: target?,
            action: action?,
            force_reindex: force_reindex?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_json() -> Value {
        json!({
            "id": "65f0c0ffee",
            "filename": "paper.pdf",
            "workspace_id": "ab12cd34",
            "content_hash": "9f86d081",
            "status": "indexed",
            "created_at": "2026-01-02T03:04:05",
            "updated_at": "2026-01-02T03:04:05"
        })
    }

    #[test]
    fn test_document_defaults_shared_with() {
        let doc: Document = validate(&doc_json()).unwrap();
        assert!(doc.shared_with.is_empty());
        assert!(doc.chunks.is_absent());
        assert_eq!(doc.known_status(), Some(DocumentStatus::Indexed));
    }

    #[test]
    fn test_document_accepts_unknown_status() {
        let mut raw = doc_json();
        raw["status"] = json!("ready");
        let doc: Document = validate(&raw).unwrap();
        assert_eq!(doc.status, "ready");
        assert!(doc.known_status().is_none());
    }

    #[test]
    fn test_document_nullable_fields() {
        let mut raw = doc_json();
        raw["chunks"] = Value::Null;
        raw["rag_config_hash"] = Value::Null;
        let doc: Document = validate(&raw).unwrap();
        assert!(doc.chunks.is_null());
        assert!(doc.rag_config_hash.is_null());

        raw["chunks"] = json!(1.5);
        let err = validate::<Document>(&raw).unwrap_err();
        assert_eq!(err.paths(), vec!["chunks"]);
    }

    #[test]
    fn test_document_detail_content() {
        let mut raw = doc_json();
        raw["content"] = json!("Abstract...");
        let detail: DocumentDetail = validate(&raw).unwrap();
        assert_eq!(detail.content.as_deref(), Some("Abstract..."));
        assert_eq!(detail.document.filename, "paper.pdf");
    }

    #[test]
    fn test_update_workspaces_payload() {
        let payload = UpdateDocumentWorkspaces::new("paper.pdf", "zz99yy88", DocumentOp::Move)
            .force_reindex();
        assert!(payload.validate().is_ok());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["action"], "move");
        assert_eq!(value["force_reindex"], true);

        let empty = UpdateDocumentWorkspaces::new("", "zz99yy88", DocumentOp::Share);
        assert_eq!(empty.validate().unwrap_err().paths(), vec!["name"]);
    }

    #[test]
    fn test_document_op_rejects_unknown() {
        let err = validate::<UpdateDocumentWorkspaces>(
            &json!({"name": "a", "target_workspace_id": "b", "action": "copy"}),
        )
        .unwrap_err();
        assert_eq!(err.paths(), vec!["action"]);
    }
}
