//! Agent tool definitions.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::validation::{Schema, ValidationError, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    System,
    Custom,
    Mcp,
}

impl Schema for ToolType {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        match v.one_of(value, &["system", "custom", "mcp"])? {
            "system" => Some(ToolType::System),
            "custom" => Some(ToolType::Custom),
            _ => Some(ToolType::Mcp),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
}

impl Schema for ToolDefinition {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let id = v.required(obj, "id", Validator::string);
        let name = v.required(obj, "name", Validator::string);
        let description = v.required(obj, "description", Validator::string);
        let tool_type = v.required(obj, "type", ToolType::parse);
        let enabled = v.required(obj, "enabled", Validator::boolean);
        let config = v.optional(obj, "config", Validator::record);
        Some(ToolDefinition {
            id: id?,
            name: name?,
            description: description?,
            tool_type: tool_type?,
            enabled: enabled?,
            config: config?,
        })
    }
}

impl ToolDefinition {
    /// A new enabled tool without configuration.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        tool_type: ToolType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tool_type,
            enabled: true,
            config: None,
        }
    }

    pub fn with_config(mut self, config: Map<String, Value>) -> Self {
        self.config = Some(config);
        self
    }

    /// Built-in tools cannot be deleted.
    pub fn is_removable(&self) -> bool {
        self.tool_type != ToolType::System
    }

    /// Checks applied before registering a tool: `id` and `name` must be
    /// non-empty and system tools are never created remotely.
    pub fn validate_registration(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.at("id", |v| v.non_empty_string(&Value::from(self.id.as_str())));
        v.at("name", |v| v.non_empty_string(&Value::from(self.name.as_str())));
        if self.tool_type == ToolType::System {
            v.at("type", |v| v.fail("one of [custom, mcp]", Some(&Value::from("system"))));
        }
        v.finish(Some(()))
    }
}
