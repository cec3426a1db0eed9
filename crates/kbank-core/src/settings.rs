//! Application and workspace settings.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::defaults::{DEFAULT_SHOW_REASONING, HYBRID_ALPHA_MAX, HYBRID_ALPHA_MIN, PROVIDER_KEYS};
use crate::validation::{Schema, ValidationError, Validator};

/// Whether `key` configures a model provider.
pub fn is_provider_key(key: &str) -> bool {
    PROVIDER_KEYS.contains(&key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalMode {
    Hybrid,
    Vector,
    Keyword,
}

impl Schema for RetrievalMode {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        match v.one_of(value, &["hybrid", "vector", "keyword"])? {
            "hybrid" => Some(RetrievalMode::Hybrid),
            "vector" => Some(RetrievalMode::Vector),
            _ => Some(RetrievalMode::Keyword),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RagEngine {
    Basic,
    Graph,
}

impl Schema for RagEngine {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        match v.one_of(value, &["basic", "graph"])? {
            "basic" => Some(RagEngine::Basic),
            _ => Some(RagEngine::Graph),
        }
    }
}

fn alpha_in_range(v: &mut Validator, value: &Value) -> Option<f64> {
    v.number_in(value, HYBRID_ALPHA_MIN, HYBRID_ALPHA_MAX)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSettings {
    pub llm_provider: String,
    pub llm_model: String,
    pub embedding_provider: String,
    pub embedding_model: String,
    pub search_limit: u32,
    /// Blend between vector (1.0) and keyword (0.0) ranking.
    pub hybrid_alpha: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub show_reasoning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval_mode: Option<RetrievalMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rag_engine: Option<RagEngine>,
}

impl AppSettings {
    /// The four provider-configuration fields as `(key, value)` pairs.
    pub fn provider_fields(&self) -> [(&'static str, &str); 4] {
        [
            (PROVIDER_KEYS[0], self.llm_provider.as_str()),
            (PROVIDER_KEYS[1], self.llm_model.as_str()),
            (PROVIDER_KEYS[2], self.embedding_provider.as_str()),
            (PROVIDER_KEYS[3], self.embedding_model.as_str()),
        ]
    }
}

impl Schema for AppSettings {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let llm_provider = v.required(obj, "llm_provider", Validator::string);
        let llm_model = v.required(obj, "llm_model", Validator::string);
        let embedding_provider = v.required(obj, "embedding_provider", Validator::string);
        let embedding_model = v.required(obj, "embedding_model", Validator::string);
        let search_limit = v.required(obj, "search_limit", Validator::positive_u32);
        let hybrid_alpha = v.required(obj, "hybrid_alpha", alpha_in_range);
        let theme = v.optional(obj, "theme", Validator::string);
        let show_reasoning =
            v.defaulted(obj, "show_reasoning", DEFAULT_SHOW_REASONING, Validator::boolean);
        let retrieval_mode = v.optional(obj, "retrieval_mode", RetrievalMode::parse);
        let rag_engine = v.optional(obj, "rag_engine", RagEngine::parse);
        Some(AppSettings {
            llm_provider: llm_provider?,
            llm_model: llm_model?,
            embedding_provider: embedding_provider?,
            embedding_model: embedding_model?,
            search_limit: search_limit?,
            hybrid_alpha: hybrid_alpha?,
            theme: theme?,
            show_reasoning: show_reasoning?,
            retrieval_mode: retrieval_mode?,
            rag_engine: rag_engine?,
        })
    }
}

/// Partial settings update sent as a PATCH body.
///
/// ```
/// use kbank_core::SettingsPatch;
///
/// let patch = SettingsPatch::new().llm_model("gpt-4o").hybrid_alpha(0.7);
/// assert!(patch.validate().is_ok());
/// assert!(patch.touches_provider());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SettingsPatch {
    updates: Map<String, Value>,
}

impl SettingsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(mut self, key: &str, value: Value) -> Self {
        self.updates.insert(key.to_string(), value);
        self
    }

    pub fn llm_provider(self, provider: impl Into<String>) -> Self {
        self.set("llm_provider", json!(provider.into()))
    }

    pub fn llm_model(self, model: impl Into<String>) -> Self {
        self.set("llm_model", json!(model.into()))
    }

    pub fn embedding_provider(self, provider: impl Into<String>) -> Self {
        self.set("embedding_provider", json!(provider.into()))
    }

    pub fn embedding_model(self, model: impl Into<String>) -> Self {
        self.set("embedding_model", json!(model.into()))
    }

    pub fn search_limit(self, limit: u32) -> Self {
        self.set("search_limit", json!(limit))
    }

    pub fn hybrid_alpha(self, alpha: f64) -> Self {
        self.set("hybrid_alpha", json!(alpha))
    }

    pub fn theme(self, theme: impl Into<String>) -> Self {
        self.set("theme", json!(theme.into()))
    }

    pub fn show_reasoning(self, show: bool) -> Self {
        self.set("show_reasoning", json!(show))
    }

    pub fn retrieval_mode(self, mode: RetrievalMode) -> Self {
        self.set("retrieval_mode", json!(mode))
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.updates.keys().map(String::as_str)
    }

    /// Whether the patch changes any provider-configuration key.
    pub fn touches_provider(&self) -> bool {
        self.keys().any(is_provider_key)
    }

    /// Apply the same constraints as [`AppSettings`] to every set key.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        if self.updates.is_empty() {
            v.fail("at least one setting", None);
        }
        for (key, value) in &self.updates {
            v.at(key, |v| match key.as_str() {
                "search_limit" => v.positive_u32(value).map(drop),
                "hybrid_alpha" => alpha_in_range(v, value).map(drop),
                "show_reasoning" => v.boolean(value).map(drop),
                "retrieval_mode" => RetrievalMode::parse(v, value).map(drop),
                _ => v.string(value).map(drop),
            });
        }
        v.finish(Some(()))
    }
}
