//! Multi-entity search results and their aggregation.
//!
//! The backend answers a global search with one collection per entity kind.
//! Each item is validated on its own; [`SearchAggregator`] decides whether a
//! bad item is dropped with a diagnostic ([`Strictness::Lenient`], the
//! default) or fails the whole aggregation ([`Strictness::Strict`]).

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

use crate::defaults::SEARCH_QUERY_MIN_LEN;
use crate::listing::partition;
use crate::validation::{Presence, Schema, ValidationError, Validator, Violation};

// =============================================================================
// ITEMS
// =============================================================================

/// One of the three result categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Workspace,
    Thread,
    Document,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Workspace, EntityKind::Thread, EntityKind::Document];

    /// Collection key in the combined response.
    pub fn key(&self) -> &'static str {
        match self {
            EntityKind::Workspace => "workspaces",
            EntityKind::Thread => "threads",
            EntityKind::Document => "documents",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

const KNOWN_ITEM_FIELDS: [&str; 7] = [
    "id",
    "name",
    "workspace_id",
    "description",
    "title",
    "extension",
    "tags",
];

/// A search hit. Fields the client does not model are kept in `extra` and
/// written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultItem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub description: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub title: Presence<String>,
    #[serde(skip_serializing_if = "Presence::is_absent")]
    pub extension: Presence<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResultItem {
    /// `name`, else `title`, else `id`.
    pub fn display_label(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.title.as_option().map(String::as_str))
            .unwrap_or(&self.id)
    }

    pub fn extra_field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl Schema for SearchResultItem {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let obj = v.object(value)?;
        let id = v.required(obj, "id", Validator::string);
        let name = v.optional(obj, "name", Validator::string);
        let workspace_id = v.optional(obj, "workspace_id", Validator::string);
        let description = v.nullable(obj, "description", Validator::string);
        let title = v.nullable(obj, "title", Validator::string);
        let extension = v.nullable(obj, "extension", Validator::string);
        let tags = v.optional(obj, "tags", Validator::string_array);
        let extra: Map<String, Value> = obj
            .iter()
            .filter(|(k, _)| !KNOWN_ITEM_FIELDS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Some(SearchResultItem {
            id: id?,
            name: name?,
            workspace_id: workspace_id?,
            description: description?,
            title: title?,
            extension: extension?,
            tags: tags?,
            extra,
        })
    }
}

/// Three independently ranked collections. No ordering holds across them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchResults {
    pub workspaces: Vec<SearchResultItem>,
    pub threads: Vec<SearchResultItem>,
    pub documents: Vec<SearchResultItem>,
}

impl SearchResults {
    pub fn get(&self, kind: EntityKind) -> &[SearchResultItem] {
        match kind {
            EntityKind::Workspace => &self.workspaces,
            EntityKind::Thread => &self.threads,
            EntityKind::Document => &self.documents,
        }
    }

    fn get_mut(&mut self, kind: EntityKind) -> &mut Vec<SearchResultItem> {
        match kind {
            EntityKind::Workspace => &mut self.workspaces,
            EntityKind::Thread => &mut self.threads,
            EntityKind::Document => &mut self.documents,
        }
    }

    /// Total hits across all kinds.
    pub fn len(&self) -> usize {
        self.workspaces.len() + self.threads.len() + self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every hit tagged with its kind, workspaces first.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &SearchResultItem)> {
        EntityKind::ALL
            .into_iter()
            .flat_map(move |kind| self.get(kind).iter().map(move |item| (kind, item)))
    }
}

// =============================================================================
// AGGREGATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Drop invalid items and report them as diagnostics.
    #[default]
    Lenient,
    /// Any invalid item fails the aggregation.
    Strict,
}

/// An item that failed validation and was left out of the results.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDiagnostic {
    pub kind: EntityKind,
    /// Position in the backend's collection.
    pub index: usize,
    pub error: ValidationError,
}

impl ItemDiagnostic {
    /// Location of the item in the combined response, e.g. `documents[3]`.
    pub fn path(&self) -> String {
        format!("{}[{}]", self.kind.key(), self.index)
    }
}

impl fmt::Display for ItemDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dropped: {}", self.path(), self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchOutcome {
    pub results: SearchResults,
    #[serde(skip)]
    pub diagnostics: Vec<ItemDiagnostic>,
}

impl SearchOutcome {
    /// Whether every item the backend returned made it into the results.
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchAggregator {
    strictness: Strictness,
}

impl SearchAggregator {
    pub fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    pub fn strict() -> Self {
        Self::new(Strictness::Strict)
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Aggregate a combined `{workspaces, threads, documents}` response.
    ///
    /// Every collection key must be present; an explicit `null` counts as
    /// empty. A collection that is not an array is a shape violation in
    /// either mode.
    pub fn aggregate(&self, raw: &Value) -> Result<SearchOutcome, ValidationError> {
        let mut v = Validator::new();
        let Some(obj) = v.object(raw) else {
            return v.finish(None);
        };
        self.assemble(EntityKind::ALL.map(|kind| (kind, obj.get(kind.key()))))
    }

    /// Aggregate three separately fetched collections.
    pub fn from_collections(
        &self,
        workspaces: &Value,
        threads: &Value,
        documents: &Value,
    ) -> Result<SearchOutcome, ValidationError> {
        self.assemble([
            (EntityKind::Workspace, Some(workspaces)),
            (EntityKind::Thread, Some(threads)),
            (EntityKind::Document, Some(documents)),
        ])
    }

    fn assemble(
        &self,
        collections: [(EntityKind, Option<&Value>); 3],
    ) -> Result<SearchOutcome, ValidationError> {
        let mut shape = Validator::new();
        let mut outcome = SearchOutcome::default();

        for (kind, raw) in collections {
            let items = match raw {
                None => {
                    shape.at(kind.key(), |v| v.fail("array", None));
                    continue;
                }
                Some(Value::Null) => continue,
                Some(Value::Array(items)) => items,
                Some(other) => {
                    shape.at(kind.key(), |v| v.fail("array", Some(other)));
                    continue;
                }
            };
            let (kept, dropped) = partition::<SearchResultItem>(items);
            *outcome.results.get_mut(kind) = kept;
            outcome.diagnostics.extend(dropped.into_iter().map(|row| ItemDiagnostic {
                kind,
                index: row.index,
                error: row.error,
            }));
        }

        let mut violations: Vec<Violation> = match shape.finish(Some(())) {
            Ok(()) => Vec::new(),
            Err(err) => err.into_violations(),
        };
        if self.strictness == Strictness::Strict {
            for diagnostic in &outcome.diagnostics {
                let prefixed = diagnostic.error.clone().prefixed(&diagnostic.path());
                violations.extend(prefixed.into_violations());
            }
        }
        if !violations.is_empty() {
            return Err(ValidationError::new(violations));
        }

        for diagnostic in &outcome.diagnostics {
            warn!(
                entity_kind = %diagnostic.kind,
                index = diagnostic.index,
                violations = %diagnostic.error,
                "Dropped invalid search result item"
            );
        }
        debug!(
            result_count = outcome.results.len(),
            dropped_count = outcome.diagnostics.len(),
            "Search results aggregated"
        );
        Ok(outcome)
    }
}

/// Trim `query` and check it is long enough to send.
pub fn check_query(query: &str) -> Result<&str, ValidationError> {
    let trimmed = query.trim();
    if trimmed.chars().count() < SEARCH_QUERY_MIN_LEN {
        return Err(ValidationError::single(
            "q",
            format!("at least {} characters", SEARCH_QUERY_MIN_LEN),
            Some(Value::from(query)),
        ));
    }
    Ok(trimmed)
}
