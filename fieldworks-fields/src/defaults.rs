//! Default field sets.
//!
//! Hosts describe the fields they want out of the box either in code with
//! the [`FieldDefaults`] builder or as YAML: a single mapping document, or a
//! directory holding one `<name>.yaml` per field.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{FieldsError, Result};
use crate::types::FieldConfig;

const BUILTIN_FIELDS: &str = include_str!("../builtin/fields.yaml");

/// A named, ordered collection of field configurations.
///
/// Hand it to `FieldRegistry::register_defaults_from()`; entries whose name is
/// already registered are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDefaults {
    fields: IndexMap<String, FieldConfig>,
}

impl FieldDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default field. A later entry with the same name replaces an
    /// earlier one.
    pub fn field(mut self, name: impl Into<String>, config: FieldConfig) -> Self {
        self.fields.insert(name.into(), config);
        self
    }

    /// Access the field configurations.
    pub fn fields(&self) -> &IndexMap<String, FieldConfig> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a YAML mapping of field name to configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }
        let fields: Option<IndexMap<String, FieldConfig>> = serde_yaml_ng::from_str(yaml)?;
        Ok(Self {
            fields: fields.unwrap_or_default(),
        })
    }

    /// Load every `*.yaml` file in `dir`, one field per file, named by the
    /// file stem. Files are read in name order; invalid ones are skipped with
    /// a warning.
    pub async fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !fs::try_exists(dir).await.unwrap_or(false) {
            return Err(FieldsError::DefaultsNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("yaml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut defaults = Self::new();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path).await?;
            match serde_yaml_ng::from_str::<FieldConfig>(&content) {
                Ok(config) => {
                    defaults.fields.insert(name.to_string(), config);
                }
                Err(e) => {
                    warn!(?path, %e, "skipping invalid field default");
                }
            }
        }

        debug!(dir = %dir.display(), count = defaults.len(), "loaded field defaults");
        Ok(defaults)
    }
}

/// The starter set shipped with the crate.
pub fn builtin_defaults() -> FieldDefaults {
    match FieldDefaults::from_yaml_str(BUILTIN_FIELDS) {
        Ok(defaults) => defaults,
        Err(e) => {
            warn!(%e, "built-in field defaults failed to parse");
            FieldDefaults::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn builder_keeps_insertion_order() {
        let defaults = FieldDefaults::new()
            .field("b", FieldConfig::new("text"))
            .field("a", FieldConfig::new("number"));
        assert_eq!(defaults.fields().keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn builtin_set_parses() {
        let defaults = builtin_defaults();
        assert!(defaults.len() >= 5);
        assert_eq!(defaults.fields()["email"].field_type, "email");
        assert!(defaults.fields()["internal_notes"].admin_only);
        assert_eq!(defaults.fields()["price"].min, Some(0.0));
    }

    #[test]
    fn empty_yaml_is_an_empty_set() {
        assert!(FieldDefaults::from_yaml_str("").unwrap().is_empty());
        assert!(FieldDefaults::from_yaml_str("- not\n- a map\n").is_err());
    }

    #[tokio::test]
    async fn load_dir_reads_one_field_per_file() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("venue.yaml"), "type: text\nrequired: true\n").unwrap();
        std::fs::write(tmp.path().join("capacity.yaml"), "type: number\nmin: 1\n").unwrap();
        std::fs::write(tmp.path().join("broken.yaml"), "type: [unclosed\n").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let defaults = FieldDefaults::load_dir(tmp.path()).await.unwrap();
        assert_eq!(
            defaults.fields().keys().collect::<Vec<_>>(),
            vec!["capacity", "venue"]
        );
        assert!(defaults.fields()["venue"].required);
    }

    #[tokio::test]
    async fn load_dir_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let err = FieldDefaults::load_dir(tmp.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, FieldsError::DefaultsNotFound { .. }));
    }
}
