//! Entity listings that keep the valid rows when some rows are malformed.
//!
//! A single unexpected row (for example the backend's seeded `default`
//! workspace, whose id is shorter than eight characters) must not hide every
//! other row. [`Listing`] validates each element on its own, keeps the ones
//! that pass and records a [`RowDiagnostic`] for each one that does not.
//! Only the array itself is a hard requirement.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::ops::Deref;

use crate::validation::{validate, Schema, ValidationError, Validator};

/// A row left out of a [`Listing`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowDiagnostic {
    /// Position in the backend's array.
    pub index: usize,
    pub error: ValidationError,
}

impl RowDiagnostic {
    /// Violations re-rooted at the row, e.g. `[0].id`.
    pub fn located(&self) -> ValidationError {
        self.error.clone().prefixed(&format!("[{}]", self.index))
    }
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} dropped: {}", self.index, self.error)
    }
}

/// Valid rows of an array payload plus a diagnostic per dropped row.
///
/// Dereferences to the valid rows and serializes as them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Listing<T> {
    pub items: Vec<T>,
    #[serde(skip)]
    pub diagnostics: Vec<RowDiagnostic>,
}

impl<T> Listing<T> {
    /// Whether every row the backend returned was kept.
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

impl<T> Deref for Listing<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for Listing<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Schema> Schema for Listing<T> {
    fn parse(v: &mut Validator, value: &Value) -> Option<Self> {
        let Value::Array(rows) = value else {
            v.fail("array", Some(value));
            return None;
        };
        let (items, diagnostics) = partition(rows);
        Some(Listing { items, diagnostics })
    }
}

/// Validate every row independently, splitting valid rows from failures.
pub(crate) fn partition<T: Schema>(rows: &[Value]) -> (Vec<T>, Vec<RowDiagnostic>) {
    let mut items = Vec::with_capacity(rows.len());
    let mut diagnostics = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match validate::<T>(row) {
            Ok(parsed) => items.push(parsed),
            Err(error) => diagnostics.push(RowDiagnostic { index, error }),
        }
    }
    (items, diagnostics)
}
