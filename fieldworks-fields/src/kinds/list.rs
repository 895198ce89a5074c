//! Storage codec shared by the multi-value kinds.
//!
//! Lists are stored as a JSON array string so any flat key-value store can
//! hold them. Decoding never fails: anything that is not a list comes back
//! as an empty list.

use crate::value::{is_empty_value, Value};

/// Encode a list value as a JSON array string.
pub fn encode_list(value: &Value) -> Value {
    let items = match value {
        Value::Array(items) => items.clone(),
        other if is_empty_value(other) => Vec::new(),
        other => vec![other.clone()],
    };
    Value::String(Value::Array(items).to_string())
}

/// Decode a stored list; malformed or non-list input yields `[]`.
pub fn decode_list(raw: &Value) -> Value {
    match raw {
        Value::Array(items) => Value::Array(items.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => Value::Array(items),
            _ => Value::Array(Vec::new()),
        },
        _ => Value::Array(Vec::new()),
    }
}
