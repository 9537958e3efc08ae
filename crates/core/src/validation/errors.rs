//! Validation failure types and aggregation.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::CoreError;

/// Which phase and check produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field was missing or empty on create.
    Required,
    /// The raw value could not be coerced into the field's kind.
    Type,
    /// The value coerced but violates a length, bound, or allowed-value set.
    Constraint,
    /// One element of a collection failed; the path carries its index.
    ArrayItem,
    /// A cross-field business rule failed.
    BusinessRule,
}

/// A single failure tied to a field path such as `tags[2]`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationError {
    pub field: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, ErrorKind::Required, format!("{field} is required"))
    }

    pub fn type_mismatch(field: &str, expected: &str) -> Self {
        Self::new(
            field,
            ErrorKind::Type,
            format!("{field} must be a valid {expected}"),
        )
    }

    pub fn constraint(field: &str, message: impl Into<String>) -> Self {
        Self::new(field, ErrorKind::Constraint, message)
    }

    pub fn rule(field: &str, message: impl Into<String>) -> Self {
        Self::new(field, ErrorKind::BusinessRule, message)
    }

    /// Re-home an element failure under `field[index]`.
    pub fn at_index(self, field: &str, index: usize) -> Self {
        Self {
            field: format!("{field}[{index}]"),
            kind: ErrorKind::ArrayItem,
            message: self.message,
        }
    }
}

/// Field-path-keyed collection of failures, in the order they were found.
///
/// Serializes as `{ "<path>": ["message", ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
    entries: IndexMap<String, Vec<ValidationError>>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.entries
            .entry(error.field.clone())
            .or_default()
            .push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        for error in errors {
            self.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct failing paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of individual failures across all paths.
    pub fn error_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn get(&self, path: &str) -> Option<&[ValidationError]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.entries.values().flatten()
    }

    /// `Ok(())` when empty, otherwise the catchable failure.
    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure(self))
        }
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, errors) in &self.entries {
            let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
            map.serialize_entry(path, &messages)?;
        }
        map.end()
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in self.errors() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

impl FromIterator<ValidationError> for ErrorMap {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

/// Catchable error carrying a non-empty [`ErrorMap`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed for {count} field(s): {errors}", count = .0.len(), errors = .0)]
pub struct ValidationFailure(pub ErrorMap);

impl ValidationFailure {
    pub fn errors(&self) -> &ErrorMap {
        &self.0
    }

    pub fn into_errors(self) -> ErrorMap {
        self.0
    }
}

impl From<ValidationFailure> for CoreError {
    fn from(failure: ValidationFailure) -> Self {
        CoreError::InvalidRecord(failure.0)
    }
}
