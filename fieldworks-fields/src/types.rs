//! Core field types for the fields registry.
//!
//! [`FieldConfig`] is what callers hand to `register()`; every member has a
//! documented default so configuration files only name what differs.
//! [`FieldDef`] is the normalized, immutable record the registry stores.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::{derive_label, Value};

/// Which record subtypes a field applies to.
///
/// `Global` (null in configuration files) is a wildcard and matches every
/// applicability query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Applicability {
    #[default]
    Global,
    One(String),
    Many(Vec<String>),
}

impl Applicability {
    pub fn is_global(&self) -> bool {
        matches!(self, Applicability::Global)
    }

    /// Whether a field with this applicability applies to records tagged `tag`.
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            Applicability::Global => true,
            Applicability::One(t) => t == tag,
            Applicability::Many(tags) => tags.iter().any(|t| t == tag),
        }
    }
}

/// Registration input for a field.
///
/// Defaults: `type: text`, no label (derived from the name), not required,
/// priority 10, global applicability, every flag off and every constraint
/// unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub description: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub placeholder: String,
    /// Ordered option key → label, used by choice kinds
    pub options: IndexMap<String, String>,
    pub searchable: bool,
    pub filterable: bool,
    pub admin_only: bool,
    /// Sort key; coerced to a non-negative integer at registration
    pub priority: i64,
    pub applicability: Applicability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    /// Allowed file extensions for file kinds, without the dot
    pub accept: Vec<String>,
    pub css_class: String,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            field_type: "text".to_string(),
            label: None,
            description: String::new(),
            required: false,
            default: None,
            placeholder: String::new(),
            options: IndexMap::new(),
            searchable: false,
            filterable: false,
            admin_only: false,
            priority: 10,
            applicability: Applicability::Global,
            min: None,
            max: None,
            step: None,
            max_length: None,
            rows: None,
            accept: Vec::new(),
            css_class: String::new(),
        }
    }
}

impl FieldConfig {
    /// A default configuration for the given kind identifier.
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn option(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.insert(key.into(), label.into());
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn applies_to(mut self, applicability: Applicability) -> Self {
        self.applicability = applicability;
        self
    }

    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn accept<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = class.into();
        self
    }
}

/// The complete, normalized schema for one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub options: IndexMap<String, String>,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub admin_only: bool,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub applicability: Applicability,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default)]
    pub accept: Vec<String>,
    #[serde(default)]
    pub css_class: String,
}

impl FieldDef {
    /// Build a definition from an already-normalized name and its config.
    ///
    /// Derives the label when none was supplied and coerces the priority to a
    /// non-negative integer.
    pub fn from_config(name: impl Into<String>, config: FieldConfig) -> Self {
        let name = name.into();
        let label = match config.label {
            Some(label) if !label.trim().is_empty() => label,
            _ => derive_label(&name),
        };
        let priority = u32::try_from(config.priority.unsigned_abs()).unwrap_or(u32::MAX);

        Self {
            name,
            field_type: config.field_type,
            label,
            description: config.description,
            required: config.required,
            default: config.default,
            placeholder: config.placeholder,
            options: config.options,
            searchable: config.searchable,
            filterable: config.filterable,
            admin_only: config.admin_only,
            priority,
            applicability: config.applicability,
            min: config.min,
            max: config.max,
            step: config.step,
            max_length: config.max_length,
            rows: config.rows,
            accept: config.accept,
            css_class: config.css_class,
        }
    }

    /// Form control name, e.g. `fields[phone]`.
    pub fn input_name(&self) -> String {
        format!("fields[{}]", self.name)
    }

    /// DOM id of the control, e.g. `field-phone`.
    pub fn input_id(&self) -> String {
        format!("field-{}", self.name)
    }

    /// Label for an option key, compared as strings.
    pub fn option_label(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn has_option(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn applies_to(&self, tag: &str) -> bool {
        self.applicability.matches(tag)
    }
}

/// Where rendered markup is going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderContext {
    /// Admin editing screen; the only context that shows admin-only fields
    Editor,
    /// Public submission form
    PublicSubmission,
    /// Read-only display; empty values are never shown
    Display,
}

impl RenderContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderContext::Editor => "editor",
            RenderContext::PublicSubmission => "public-submission",
            RenderContext::Display => "display",
        }
    }

    /// Whether this context renders input controls.
    pub fn is_interactive(&self) -> bool {
        !matches!(self, RenderContext::Display)
    }
}

impl fmt::Display for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
