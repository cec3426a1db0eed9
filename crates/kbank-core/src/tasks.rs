//! Background task records for uploads, indexing and workspace moves.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::defaults::TASK_PROGRESS_MAX;
use crate::listing::Listing;
use crate::validation::{Presence, Schema, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Canceled,
}

impl TaskStatus {
    /// Still queued or running.
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Processing)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

impl Schema for TaskStatus {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let status = v.one_of(
            value,
            &["pending", "processing", "completed", "failed", "canceled"],
        )?;
        Some(match status {
            "pending" => TaskStatus::Pending,
            "processing" => TaskStatus::Processing,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            _ => TaskStatus::Canceled,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub status: TaskStatus,
    pub progress: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub error_code: Presence<String>,
    pub metadata: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub result: Presence<Map<String, Value>>,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// File name the task operates on, when the backend recorded one.
    pub fn filename(&self) -> Option<&str> {
        self.metadata.get("filename").and_then(Value::as_str)
    }
}

impl Schema for Task {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let id = v.required(obj, "id", Validator::string);
        let task_type = v.required(obj, "type", Validator::string);
        let status = v.required(obj, "status", TaskStatus::parse);
        let progress = v.required(obj, "progress", |v, x| v.integer_in(x, 0, TASK_PROGRESS_MAX));
        let message = v.required(obj, "message", Validator::string);
        let error_code = v.nullable(obj, "error_code", Validator::string);
        let metadata = v.defaulted(obj, "metadata", Map::new(), Validator::record);
        let workspace_id = v.optional(obj, "workspace_id", Validator::string);
        let result = v.nullable(obj, "result", Validator::record);
        let created_at = v.required(obj, "created_at", Validator::string);
        let updated_at = v.required(obj, "updated_at", Validator::string);
        Some(Task {
            id: id?,
            task_type: task_type?,
            status: status?,
            progress: progress?,
            message: message?,
            error_code: error_code?,
            metadata: metadata?,
            workspace_id: workspace_id?,
            result: result?,
            created_at: created_at?,
            updated_at: updated_at?,
        })
    }
}

/// `{"tasks": [...]}` payload of the task listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskList {
    pub tasks: Listing<Task>,
}

impl Schema for TaskList {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let tasks = v.required(obj, "tasks", Listing::<Task>::parse)?;
        Some(TaskList { tasks })
    }
}

/// Receipt for work the backend queued in the background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskAccepted {
    pub status: String,
    pub task_id: String,
    pub message: String,
}

impl Schema for TaskAccepted {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let status = v.required(obj, "status", Validator::string);
        let task_id = v.required(obj, "task_id", Validator::non_empty_string);
        let message = v.defaulted(obj, "message", String::new(), Validator::string);
        Some(TaskAccepted {
            status: status?,
            task_id: task_id?,
            message: message?,
        })
    }
}
