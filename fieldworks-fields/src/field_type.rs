//! The contract every field kind implements.

use crate::error::FieldOutcome;
use crate::types::FieldDef;
use crate::value::{is_empty_value, Value};

/// What a kind supports, for callers that treat kinds generically
/// (search indexing, filter widgets, sortable columns, multi-value storage).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub searchable: bool,
    pub filterable: bool,
    pub sortable: bool,
    pub repeater: bool,
}

impl Capabilities {
    pub const fn none() -> Self {
        Self {
            searchable: false,
            filterable: false,
            sortable: false,
            repeater: false,
        }
    }

    pub const fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub const fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub const fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub const fn repeater(mut self) -> Self {
        self.repeater = true;
        self
    }
}

/// A field kind: a stateless strategy bound to one identifier.
///
/// Kinds are registered once per identifier in a
/// [`TypeRegistry`](crate::TypeRegistry) and looked up by the identifier stored
/// in each [`FieldDef`]. Implementations must be `Send + Sync` so a frozen
/// registry can be shared.
pub trait FieldType: Send + Sync {
    /// Unique identifier, e.g. `"checkboxgroup"`.
    fn identifier(&self) -> &str;

    /// Human name of the kind, e.g. `"Checkbox Group"`.
    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities {
        Capabilities::none()
    }

    /// Input control markup for editor and public-submission contexts.
    fn render(&self, def: &FieldDef, value: &Value) -> String;

    /// Escaped read-only markup. An empty string suppresses the field.
    fn format_for_display(&self, value: &Value, def: &FieldDef) -> String;

    /// The kind's own empty value.
    fn default_value(&self) -> Value {
        Value::Null
    }

    /// Clean untrusted input without knowledge of the field.
    fn sanitize(&self, value: &Value) -> Value;

    /// Clean untrusted input using the field's configuration.
    ///
    /// The validator always calls this form; kinds that need the definition
    /// (options, numeric step) override it.
    fn sanitize_with_field(&self, value: &Value, _def: &FieldDef) -> Value {
        self.sanitize(value)
    }

    /// Check a value against the field's rules.
    ///
    /// Implementations call [`check_presence`] first so that an empty value on
    /// an optional field is always valid.
    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        check_presence(value, def).unwrap_or(Ok(()))
    }

    /// Storable representation of a runtime value.
    fn encode_for_storage(&self, value: &Value) -> Value {
        value.clone()
    }

    /// Runtime representation of a stored value. Must not fail.
    fn decode_from_storage(&self, raw: &Value) -> Value {
        raw.clone()
    }
}

/// The message every kind reports for a required field left empty.
pub fn required_message(def: &FieldDef) -> String {
    format!("{} is required.", def.label)
}

/// The shared required/optional rule.
///
/// Returns `Some` when the value is empty: success for optional fields, the
/// required message otherwise. Returns `None` for non-empty values so the kind
/// goes on with its own checks.
pub fn check_presence(value: &Value, def: &FieldDef) -> Option<FieldOutcome> {
    if !is_empty_value(value) {
        return None;
    }
    if def.required {
        Some(Err(vec![required_message(def)]))
    } else {
        Some(Ok(()))
    }
}
