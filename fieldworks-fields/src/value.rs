//! Runtime value helpers shared by every field kind.
//!
//! Field values travel through the engine as [`serde_json::Value`], which
//! already models the shapes kinds need (strings, numbers, booleans, lists).

use indexmap::IndexMap;

pub use serde_json::Value;

/// Values keyed by field name, in submission order.
pub type Values = IndexMap<String, Value>;

/// Identifier of the record a set of values belongs to.
pub type RecordId = u64;

/// Whether a value counts as "nothing was supplied".
///
/// Lists are empty iff they have no items, strings iff they are blank after
/// trimming, and every other value iff it is null. `0` and `false` are values.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// The canonical empty value for the shape of `value`.
pub fn empty_sentinel(value: &Value) -> Value {
    match value {
        Value::Array(_) => Value::Array(Vec::new()),
        Value::String(_) => Value::String(String::new()),
        _ => Value::Null,
    }
}

/// Flat string form of a value. Null and `false` become the empty string.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Normalize a raw name to the key alphabet `[a-z0-9_-]`.
pub fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Human label for a field name: `first_name` becomes `First Name`.
pub fn derive_label(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Items of a list-shaped value as strings.
///
/// A non-empty scalar counts as a one-item list, so a single submitted value
/// for a multi-value field is not lost.
pub fn string_items(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_to_string).collect(),
        other if is_empty_value(other) => Vec::new(),
        other => vec![value_to_string(other)],
    }
}
