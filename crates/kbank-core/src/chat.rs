//! Chat messages and threads.

use serde::Serialize;
use serde_json::Value;

use crate::listing::Listing;
use crate::validation::{Presence, Schema, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Schema for Role {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        match v.one_of(value, &["user", "assistant"])? {
            "user" => Some(Role::User),
            _ => Some(Role::Assistant),
        }
    }
}

/// A retrieved passage cited by an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub content: String,
}

impl Schema for Source {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let id = v.required(obj, "id", Validator::integer);
        let name = v.required(obj, "name", Validator::string);
        let content = v.required(obj, "content", Validator::string);
        Some(Source {
            id: id?,
            name: name?,
            content: content?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_steps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Source>>,
}

impl Message {
    /// Citation lookup by the numeric marker used in the content.
    pub fn source(&self, id: i64) -> Option<&Source> {
        self.sources.as_ref()?.iter().find(|s| s.id == id)
    }
}

impl Schema for Message {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let id = v.required(obj, "id", Validator::string);
        let role = v.required(obj, "role", Role::parse);
        let content = v.required(obj, "content", Validator::string);
        let reasoning_steps = v.optional(obj, "reasoning_steps", Validator::string_array);
        let tools = v.optional(obj, "tools", Validator::string_array);
        let sources = v.optional(obj, "sources", Vec::<Source>::parse);
        Some(Message {
            id: id?,
            role: role?,
            content: content?,
            reasoning_steps: reasoning_steps?,
            tools: tools?,
            sources: sources?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thread {
    pub id: String,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub title: Presence<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_thinking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Schema for Thread {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let id = v.required(obj, "id", Validator::string);
        let title = v.nullable(obj, "title", Validator::string);
        let has_thinking = v.optional(obj, "has_thinking", Validator::boolean);
        let tags = v.optional(obj, "tags", Validator::string_array);
        let updated_at = v.optional(obj, "updated_at", Validator::string);
        Some(Thread {
            id: id?,
            title: title?,
            has_thinking: has_thinking?,
            tags: tags?,
            updated_at: updated_at?,
        })
    }
}

/// `{"messages": [...]}` payload of the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageHistory {
    pub messages: Vec<Message>,
}

impl Schema for MessageHistory {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let messages = v.required(obj, "messages", Vec::<Message>::parse)?;
        Some(MessageHistory { messages })
    }
}

/// `{"threads": [...]}` payload of the thread listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadList {
    pub threads: Listing<Thread>,
}

impl Schema for ThreadList {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let threads = v.required(obj, "threads", Listing::<Thread>::parse)?;
        Some(ThreadList { threads })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn test_assistant_message_with_sources() {
        let raw = json!({
            "id": "m2",
            "role": "assistant",
            "content": "Rust has no GC [1].",
            "reasoning_steps": ["retrieve", "answer"],
            "tools": ["search_documents"],
            "sources": [{"id": 1, "name": "rust.md", "content": "ownership"}]
        });
        let message: Message = validate(&raw).unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.source(1).unwrap().name, "rust.md");
        assert!(message.source(2).is_none());
        assert_eq!(serde_json::to_value(&message).unwrap(), raw);
    }

    #[test]
    fn test_message_rejects_unknown_role() {
        let err = validate::<Message>(&json!({"id": "m", "role": "system", "content": ""}))
            .unwrap_err();
        assert_eq!(err.paths(), vec!["role"]);
        assert!(err.violations()[0].expected.contains("user, assistant"));
    }

    #[test]
    fn test_source_id_must_be_integer() {
        let raw = json!({
            "id": "m",
            "role": "assistant",
            "content": "",
            "sources": [
                {"id": 1, "name": "a", "content": "x"},
                {"id": "2", "name": "b", "content": "y"},
                {"id": 2.5, "name": "c"}
            ]
        });
        let err = validate::<Message>(&raw).unwrap_err();
        assert_eq!(
            err.paths(),
            vec!["sources[1].id", "sources[2].id", "sources[2].content"]
        );
    }

    #[test]
    fn test_thread_title_presence() {
        let untitled: Thread = validate(&json!({"id": "t"})).unwrap();
        let nulled: Thread = validate(&json!({"id": "t", "title": null})).unwrap();
        let titled: Thread = validate(&json!({"id": "t", "title": "Plans"})).unwrap();
        assert!(untitled.title.is_absent());
        assert!(nulled.title.is_null());
        assert_eq!(titled.title.as_option().map(String::as_str), Some("Plans"));
    }

    #[test]
    fn test_thread_round_trip_keeps_null_title() {
        let raw = json!({"id": "t", "title": null, "has_thinking": true, "tags": ["a"]});
        let thread: Thread = validate(&raw).unwrap();
        assert_eq!(serde_json::to_value(&thread).unwrap(), raw);
    }

    #[test]
    fn test_thread_list_requires_key() {
        let list: ThreadList = validate(&json!({"threads": [{"id": "a"}, {"id": "b"}]})).unwrap();
        assert_eq!(list.threads.len(), 2);
        let err = validate::<ThreadList>(&json!({"items": []})).unwrap_err();
        assert_eq!(err.paths(), vec!["threads"]);
    }

    #[test]
    fn test_thread_list_keeps_valid_rows() {
        let list: ThreadList =
            validate(&json!({"threads": [{"id": "a"}, {"title": "orphan"}, {"id": "c"}]})).unwrap();
        assert_eq!(list.threads.len(), 2);
        assert_eq!(list.threads.diagnostics[0].index, 1);
        assert!(list.threads.diagnostics[0].error.has_path("id"));
    }

    #[test]
    fn test_history_reports_indexed_paths() {
        let err = validate::<MessageHistory>(&json!({"messages": [{"id": "a", "role": "user", "content": "hi"}, {"id": "b"}]}))
            .unwrap_err();
        assert_eq!(err.paths(), vec!["messages[1].role", "messages[1].content"]);
    }
}
