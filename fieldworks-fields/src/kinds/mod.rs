//! Stock field kinds.
//!
//! Each kind is a unit struct implementing [`FieldType`]. [`builtin_types`]
//! lists them all; `TypeRegistry::with_builtin_types()` registers them.

use std::sync::Arc;

use crate::error::FieldOutcome;
use crate::field_type::FieldType;
use crate::markup::{fmt_number, Tag};
use crate::types::FieldDef;
use crate::value::{value_to_string, Value};

mod choice;
mod color;
mod contact;
mod list;
mod media;
mod number;
mod temporal;
mod text;

pub use choice::{CheckboxField, CheckboxGroupField, MultiSelectField, RadioField, SelectField};
pub use color::ColorField;
pub use contact::{EmailField, PhoneField, UrlField};
pub use list::{decode_list, encode_list};
pub use media::{FileField, GalleryField, ImageField};
pub use number::NumberField;
pub use temporal::{DateField, DateTimeField, TimeField};
pub use text::{HiddenField, PasswordField, RichTextField, TextField, TextareaField};

/// Every stock kind, in registration order.
pub fn builtin_types() -> Vec<Arc<dyn FieldType>> {
    vec![
        Arc::new(TextField),
        Arc::new(TextareaField),
        Arc::new(RichTextField),
        Arc::new(EmailField),
        Arc::new(UrlField),
        Arc::new(PhoneField),
        Arc::new(NumberField),
        Arc::new(DateField),
        Arc::new(TimeField),
        Arc::new(DateTimeField),
        Arc::new(ColorField),
        Arc::new(SelectField),
        Arc::new(RadioField),
        Arc::new(CheckboxField),
        Arc::new(MultiSelectField),
        Arc::new(CheckboxGroupField),
        Arc::new(FileField),
        Arc::new(ImageField),
        Arc::new(GalleryField),
        Arc::new(HiddenField),
        Arc::new(PasswordField),
    ]
}

/// Apply a string cleaner to a scalar value. Lists and objects become "".
pub(crate) fn map_string(value: &Value, clean: impl Fn(&str) -> String) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(s) => Value::String(clean(s)),
        Value::Bool(_) | Value::Number(_) => Value::String(clean(&value_to_string(value))),
        Value::Array(_) | Value::Object(_) => Value::String(String::new()),
    }
}

/// `<input>` carrying the attributes every single-value control shares.
pub(crate) fn base_input(input_type: &str, def: &FieldDef, value: &str) -> Tag {
    let mut tag = Tag::new("input")
        .attr("type", input_type)
        .attr("id", def.input_id())
        .attr("name", def.input_name())
        .attr("value", value)
        .attr_opt("placeholder", &def.placeholder)
        .attr_opt("class", &def.css_class)
        .flag_if(def.required, "required");
    if def.required {
        tag = tag.attr("aria-required", "true");
    }
    if !def.description.is_empty() {
        tag = tag.attr("aria-describedby", format!("{}-description", def.input_id()));
    }
    if let Some(max_length) = def.max_length {
        tag = tag.attr("maxlength", max_length.to_string());
    }
    tag
}

pub(crate) fn text_input(input_type: &str, def: &FieldDef, value: &Value) -> String {
    base_input(input_type, def, &value_to_string(value)).void()
}

pub(crate) fn numeric_attrs(mut tag: Tag, def: &FieldDef) -> Tag {
    if let Some(min) = def.min {
        tag = tag.attr("min", fmt_number(min));
    }
    if let Some(max) = def.max {
        tag = tag.attr("max", fmt_number(max));
    }
    if let Some(step) = def.step {
        tag = tag.attr("step", fmt_number(step));
    }
    tag
}

/// Enforce `max_length` on a text value, counting characters.
pub(crate) fn check_max_length(text: &str, def: &FieldDef) -> FieldOutcome {
    match def.max_length {
        Some(max) if text.chars().count() > max => Err(vec![format!(
            "{} must be at most {} characters.",
            def.label, max
        )]),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_identifiers_are_unique() {
        let types = builtin_types();
        let ids: HashSet<_> = types.iter().map(|t| t.identifier().to_string()).collect();
        assert_eq!(ids.len(), types.len());
        assert!(types.len() >= 20);
        for id in ["text", "number", "email", "phone", "checkboxgroup", "gallery"] {
            assert!(ids.contains(id), "missing stock kind {id}");
        }
    }
}
