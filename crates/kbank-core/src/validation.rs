//! Declarative validation of decoded JSON into typed entities.
//!
//! Every entity implements [`Schema`]. Parsing is total: it accepts any
//! [`Value`], never panics, and collects *every* violated constraint with
//! its field path instead of stopping at the first one.
//!
//! ```
//! use kbank_core::{validate, Thread};
//! use serde_json::json;
//!
//! let thread: Thread = validate(&json!({"id": "t-1", "title": null})).unwrap();
//! assert!(thread.title.is_null());
//!
//! let err = validate::<Thread>(&json!({"title": 7})).unwrap_err();
//! assert!(err.has_path("id"));
//! assert!(err.has_path("title"));
//! ```

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Longest rendering of an offending value kept in a violation message.
const ACTUAL_PREVIEW_LEN: usize = 48;

// =============================================================================
// VIOLATIONS
// =============================================================================

/// One violated constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Dotted/indexed path, e.g. `data.sources[1].id`. Empty for the root.
    pub path: String,
    /// Human-readable constraint that was expected.
    pub expected: String,
    /// Offending value; `None` when the field was absent.
    pub actual: Option<Value>,
}

impl Violation {
    pub fn new(path: impl Into<String>, expected: impl Into<String>, actual: Option<Value>) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual,
        }
    }

    /// Re-root this violation under `prefix`.
    fn prefixed(mut self, prefix: &str) -> Self {
        self.path = join_path(prefix, &self.path);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "(root)"
        } else {
            self.path.as_str()
        };
        write!(
            f,
            "{}: expected {}, got {}",
            path,
            self.expected,
            describe_actual(self.actual.as_ref())
        )
    }
}

fn describe_actual(actual: Option<&Value>) -> String {
    match actual {
        None => "nothing".to_string(),
        Some(value) => {
            let rendered = value.to_string();
            if rendered.chars().count() > ACTUAL_PREVIEW_LEN {
                let cut: String = rendered.chars().take(ACTUAL_PREVIEW_LEN).collect();
                format!("{}…", cut)
            } else {
                rendered
            }
        }
    }
}

fn join_path(prefix: &str, rest: &str) -> String {
    match (prefix.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) if rest.starts_with('[') => format!("{}{}", prefix, rest),
        (false, false) => format!("{}.{}", prefix, rest),
    }
}

/// Where an envelope validation failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScope {
    /// `success`, `code`, `message`, or the envelope object itself.
    Envelope,
    /// Inside `data`.
    Payload,
}

/// Shape validation failure carrying every violation found.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", summarize(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn summarize(violations: &[Violation]) -> String {
    let parts: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
    format!("{} violation(s): {}", violations.len(), parts.join("; "))
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Single-violation shorthand for local input checks.
    pub fn single(path: impl Into<String>, expected: impl Into<String>, actual: Option<Value>) -> Self {
        Self::new(vec![Violation::new(path, expected, actual)])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether any violation sits exactly at `path`.
    pub fn has_path(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.path.as_str()).collect()
    }

    /// Re-root every violation under `prefix`.
    pub fn prefixed(self, prefix: &str) -> Self {
        Self {
            violations: self
                .violations
                .into_iter()
                .map(|v| v.prefixed(prefix))
                .collect(),
        }
    }

    /// `Payload` when every violation lies inside `data`, `Envelope` otherwise.
    pub fn scope(&self) -> ValidationScope {
        let in_payload = |p: &str| p == "data" || p.starts_with("data.") || p.starts_with("data[");
        if !self.violations.is_empty() && self.violations.iter().all(|v| in_payload(&v.path)) {
            ValidationScope::Payload
        } else {
            ValidationScope::Envelope
        }
    }
}

// =============================================================================
// PRESENCE
// =============================================================================

/// Three-way presence for fields that are both optional and nullable.
///
/// `Absent` and `Null` are kept apart: the backend distinguishes an omitted
/// field from one explicitly set to `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Presence<T> {
    fn default() -> Self {
        Presence::Absent
    }
}

impl<T> Presence<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Presence::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Presence::Null)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Presence::Value(_))
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Presence::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Presence::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Presence<U> {
        match self {
            Presence::Absent => Presence::Absent,
            Presence::Null => Presence::Null,
            Presence::Value(v) => Presence::Value(f(v)),
        }
    }
}

impl<T> From<Option<T>> for Presence<T> {
    /// `None` maps to `Null`: an explicit "no value".
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Presence::Value(v),
            None => Presence::Null,
        }
    }
}

/// Absent fields must be skipped with
/// `#[serde(skip_serializing_if = "Presence::is_absent")]`; if not, they
/// serialize as `null`.
impl<T: Serialize> Serialize for Presence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Presence::Value(v) => v.serialize(serializer),
            Presence::Absent | Presence::Null => serializer.serialize_none(),
        }
    }
}

// =============================================================================
// SCHEMA + VALIDATOR
// =============================================================================

/// A type that can be validated out of an arbitrary JSON value.
pub trait Schema: Sized {
    /// Parse `value`, recording violations on `v`. Returns `None` when any
    /// constraint inside this value failed.
    fn parse(v: &mut Validator, value: &Value) -> Option<Self>;
}

/// Validate `value` against `T`'s schema.
pub fn validate<T: Schema>(value: &Value) -> Result<T, ValidationError> {
    let mut v = Validator::new();
    let parsed = T::parse(&mut v, value);
    v.finish(parsed)
}

impl<T: Schema> Schema for Vec<T> {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        v.array(value, T::parse)
    }
}

impl Schema for Value {
    fn parse(_v: &mut Validator, value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Accumulates violations while walking a value.
#[derive(Debug, Default)]
pub struct Validator {
    path: Vec<Segment>,
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert the accumulated state into a result.
    pub fn finish<T>(self, parsed: Option<T>) -> Result<T, ValidationError> {
        match parsed {
            Some(value) if self.violations.is_empty() => Ok(value),
            _ => {
                let mut violations = self.violations;
                if violations.is_empty() {
                    violations.push(Violation::new("", "valid value", None));
                }
                Err(ValidationError::new(violations))
            }
        }
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    fn current_path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                Segment::Key(k) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(k);
                }
                Segment::Index(i) => out.push_str(&format!("[{}]", i)),
            }
        }
        out
    }

    /// Record a violation at the current path.
    pub fn fail(&mut self, expected: impl Into<String>, actual: Option<&Value>) {
        let path = self.current_path();
        self.violations
            .push(Violation::new(path, expected, actual.cloned()));
    }

    /// Run `f` with `key` appended to the path.
    pub fn at<R>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(Segment::Key(key.to_string()));
        let out = f(self);
        self.path.pop();
        out
    }

    /// Run `f` with `[index]` appended to the path.
    pub fn at_index<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(Segment::Index(index));
        let out = f(self);
        self.path.pop();
        out
    }

    // ─── Containers ──────────────────────────────────────────────────────

    pub fn object<'a>(&mut self, value: &'a Value) -> Option<&'a Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.fail("object", Some(other));
                None
            }
        }
    }

    /// Open key→value mapping, kept verbatim.
    pub fn record(&mut self, value: &Value) -> Option<Map<String, Value>> {
        self.object(value).cloned()
    }

    /// Validate each element; fails if any element fails.
    pub fn array<T>(
        &mut self,
        value: &Value,
        mut f: impl FnMut(&mut Self, &Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        let items = match value {
            Value::Array(items) => items,
            other => {
                self.fail("array", Some(other));
                return None;
            }
        };
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match self.at_index(i, |v| f(v, item)) {
                Some(parsed) => out.push(parsed),
                None => ok = false,
            }
        }
        ok.then_some(out)
    }

    pub fn string_array(&mut self, value: &Value) -> Option<Vec<String>> {
        self.array(value, Self::string)
    }

    // ─── Field presence ──────────────────────────────────────────────────

    /// Field must be present and non-null.
    pub fn required<T>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        f: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<T> {
        match obj.get(key) {
            None => {
                self.at(key, |v| v.fail("required", None));
                None
            }
            Some(value) => self.at(key, |v| f(v, value)),
        }
    }

    /// Field may be omitted but must not be `null`.
    ///
    /// Returns `Some(None)` when absent, `None` when present and invalid.
    pub fn optional<T>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        f: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<Option<T>> {
        match obj.get(key) {
            None => Some(None),
            Some(value) => self.at(key, |v| f(v, value)).map(Some),
        }
    }

    /// Field may be omitted, `null`, or a valid value.
    pub fn nullable<T>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        f: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<Presence<T>> {
        match obj.get(key) {
            None => Some(Presence::Absent),
            Some(Value::Null) => Some(Presence::Null),
            Some(value) => self.at(key, |v| f(v, value)).map(Presence::Value),
        }
    }

    /// Field may be omitted, in which case `default` is used.
    pub fn defaulted<T>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        default: T,
        f: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<T> {
        self.optional(obj, key, f).map(|v| v.unwrap_or(default))
    }

    // ─── Leaves ──────────────────────────────────────────────────────────

    pub fn string(&mut self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.fail("string", Some(other));
                None
            }
        }
    }

    pub fn non_empty_string(&mut self, value: &Value) -> Option<String> {
        self.string_len(value, 1, None)
    }

    /// String with a character count in `[min, max]`.
    pub fn string_len(&mut self, value: &Value, min: usize, max: Option<usize>) -> Option<String> {
        let s = self.string(value)?;
        let len = s.chars().count();
        let fits = len >= min && max.map_or(true, |m| len <= m);
        if fits {
            return Some(s);
        }
        let expected = match max {
            Some(m) if m == min => format!("exactly {} characters", m),
            Some(m) if min == 0 => format!("at most {} characters", m),
            Some(m) => format!("between {} and {} characters", min, m),
            None if min == 1 => "non-empty string".to_string(),
            None => format!("at least {} characters", min),
        };
        self.fail(expected, Some(value));
        None
    }

    pub fn boolean(&mut self, value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            other => {
                self.fail("boolean", Some(other));
                None
            }
        }
    }

    pub fn number(&mut self, value: &Value) -> Option<f64> {
        match value.as_f64() {
            Some(n) => Some(n),
            None => {
                self.fail("number", Some(value));
                None
            }
        }
    }

    /// Number within `[min, max]`, both inclusive.
    pub fn number_in(&mut self, value: &Value, min: f64, max: f64) -> Option<f64> {
        let n = self.number(value)?;
        if n >= min && n <= max {
            Some(n)
        } else {
            self.fail(format!("number between {} and {}", min, max), Some(value));
            None
        }
    }

    /// Whole number; `3.0` counts as an integer.
    pub fn integer(&mut self, value: &Value) -> Option<i64> {
        if let Some(i) = value.as_i64() {
            return Some(i);
        }
        match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                Some(f as i64)
            }
            _ => {
                self.fail("integer", Some(value));
                None
            }
        }
    }

    pub fn integer_in(&mut self, value: &Value, min: i64, max: i64) -> Option<i64> {
        let n = self.integer(value)?;
        if (min..=max).contains(&n) {
            Some(n)
        } else {
            self.fail(format!("integer between {} and {}", min, max), Some(value));
            None
        }
    }

    pub fn positive_u32(&mut self, value: &Value) -> Option<u32> {
        let n = self.integer(value)?;
        match u32::try_from(n) {
            Ok(n) if n > 0 => Some(n),
            _ => {
                self.fail("positive integer", Some(value));
                None
            }
        }
    }

    /// String restricted to a fixed set of values.
    pub fn one_of<'a>(&mut self, value: &Value, allowed: &[&'a str]) -> Option<&'a str> {
        let s = self.string(value)?;
        match allowed.iter().find(|a| **a == s) {
            Some(hit) => Some(*hit),
            None => {
                self.fail(format!("one of [{}]", allowed.join(", ")), Some(value));
                None
            }
        }
    }

    /// String fully matching `re`; `description` names the charset for humans.
    pub fn matching(&mut self, value: &Value, re: &regex::Regex, description: &str) -> Option<String> {
        let s = self.string(value)?;
        if re.is_match(&s) {
            Some(s)
        } else {
            self.fail(description.to_string(), Some(value));
            None
        }
    }

    pub fn any(&mut self, value: &Value) -> Option<Value> {
        Some(value.clone())
    }
}
