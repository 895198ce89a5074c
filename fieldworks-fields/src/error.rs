//! Error types for the fields registry

use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Outcome of validating a single field: success, or its ordered messages.
pub type FieldOutcome = std::result::Result<(), Vec<String>>;

/// Errors that can occur in field registry operations
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Field not found by name
    #[error("unknown field: {name}")]
    FieldNotFound { name: String },

    /// Field definition names a kind nobody registered
    #[error("unknown field type: {field_type}")]
    UnknownFieldType { field_type: String },

    /// Name normalized to nothing
    #[error("invalid field name: {raw:?}")]
    InvalidFieldName { raw: String },

    /// Duplicate field name
    #[error("duplicate field name: {name}")]
    DuplicateFieldName { name: String },

    /// Duplicate field kind identifier
    #[error("duplicate field type: {identifier}")]
    DuplicateFieldType { identifier: String },

    /// Storage backend rejected a read or write
    #[error("storage error: {0}")]
    Storage(String),

    /// Default-set directory not found
    #[error("defaults directory not found: {path}")]
    DefaultsNotFound { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Broad classes of failure, used by hosts to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller referenced a field or kind that does not exist
    Configuration,
    /// A registration collided with an existing one
    Conflict,
    /// Input was rejected by a validation rule
    Validation,
    /// Storage, filesystem or (de)serialization failed
    Infrastructure,
}

impl FieldsError {
    /// Which class of failure this is.
    pub fn category(&self) -> ErrorCategory {
        match self {
            FieldsError::FieldNotFound { .. } | FieldsError::UnknownFieldType { .. } => {
                ErrorCategory::Configuration
            }
            FieldsError::DuplicateFieldName { .. } | FieldsError::DuplicateFieldType { .. } => {
                ErrorCategory::Conflict
            }
            FieldsError::InvalidFieldName { .. } => ErrorCategory::Validation,
            FieldsError::Storage(_)
            | FieldsError::DefaultsNotFound { .. }
            | FieldsError::Io(_)
            | FieldsError::Yaml(_)
            | FieldsError::Json(_) => ErrorCategory::Infrastructure,
        }
    }
}

/// Messages for every field that failed validation, keyed by field name.
///
/// A field present in the set always has at least one message. Serializes to a
/// plain JSON object, e.g. `{"email": ["Email is required."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    errors: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message to a field's bucket.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Append several messages to a field's bucket. No-op when `messages` is empty.
    pub fn extend<I, S>(&mut self, field: &str, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut messages = messages.into_iter().map(Into::into).peekable();
        if messages.peek().is_none() {
            return;
        }
        self.errors
            .entry(field.to_string())
            .or_default()
            .extend(messages);
    }

    /// Fold another error set into this one, field by field.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.extend(&field, messages);
        }
    }

    /// Drop every message for a field. Returns the removed messages.
    pub fn remove(&mut self, field: &str) -> Option<Vec<String>> {
        self.errors.shift_remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Names of the fields with errors, in the order they failed.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    pub fn into_map(self) -> IndexMap<String, Vec<String>> {
        self.errors
    }
}

impl From<IndexMap<String, Vec<String>>> for ValidationErrors {
    fn from(map: IndexMap<String, Vec<String>>) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, messages) in map {
            errors.extend(&field, messages);
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldsError::FieldNotFound {
            name: "status".into(),
        };
        assert_eq!(err.to_string(), "unknown field: status");

        let err = FieldsError::UnknownFieldType {
            field_type: "hologram".into(),
        };
        assert_eq!(err.to_string(), "unknown field type: hologram");
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            FieldsError::FieldNotFound { name: "x".into() }.category(),
            ErrorCategory::Configuration
        );
        assert_eq!(
            FieldsError::DuplicateFieldName { name: "x".into() }.category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            FieldsError::DuplicateFieldType {
                identifier: "x".into()
            }
            .category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            FieldsError::Storage("down".into()).category(),
            ErrorCategory::Infrastructure
        );
    }

    #[test]
    fn validation_errors_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("email", "Email is required.");
        errors.add("tags", "bad one");
        errors.add("tags", "bad two");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("tags").unwrap(), ["bad one", "bad two"]);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "tags"]);
    }

    #[test]
    fn extend_with_nothing_creates_no_bucket() {
        let mut errors = ValidationErrors::new();
        errors.extend("phone", Vec::<String>::new());
        assert!(!errors.contains("phone"));
        assert!(errors.is_empty());
    }

    #[test]
    fn merge_and_remove() {
        let mut a = ValidationErrors::new();
        a.add("email", "one");
        let mut b = ValidationErrors::new();
        b.add("email", "two");
        b.add("phone", "three");

        a.merge(b);
        assert_eq!(a.get("email").unwrap().len(), 2);
        assert_eq!(a.remove("phone"), Some(vec!["three".to_string()]));
        assert!(!a.contains("phone"));
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Email is required.");
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"email":["Email is required."]}"#);
        assert_eq!(errors.to_string(), "1 field(s) failed validation");
    }
}
