//! Kinds whose values are drawn from the field's `options`.
//!
//! Option keys are compared as strings, so a submitted `1` matches the key
//! `"1"`.

use crate::error::FieldOutcome;
use crate::field_type::{check_presence, required_message, Capabilities, FieldType};
use crate::markup::{esc, Tag};
use crate::sanitize::sanitize_text;
use crate::types::FieldDef;
use crate::value::{is_empty_value, string_items, value_to_string, Value};

use super::{decode_list, encode_list, map_string};

fn invalid_option(def: &FieldDef, value: &str) -> String {
    format!("{}: \"{}\" is not a valid option.", def.label, value)
}

fn validate_one(value: &Value, def: &FieldDef) -> FieldOutcome {
    if let Some(outcome) = check_presence(value, def) {
        return outcome;
    }
    let key = value_to_string(value);
    if def.has_option(&key) {
        Ok(())
    } else {
        Err(vec![invalid_option(def, &key)])
    }
}

fn validate_many(value: &Value, def: &FieldDef) -> FieldOutcome {
    if let Some(outcome) = check_presence(value, def) {
        return outcome;
    }
    let errors: Vec<String> = string_items(value)
        .iter()
        .filter(|item| !def.has_option(item))
        .map(|item| invalid_option(def, item))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn display_one(value: &Value, def: &FieldDef) -> String {
    if is_empty_value(value) {
        return String::new();
    }
    let key = value_to_string(value);
    esc(def.option_label(&key).unwrap_or(key.as_str()))
}

fn display_many(value: &Value, def: &FieldDef) -> String {
    string_items(value)
        .iter()
        .map(|key| esc(def.option_label(key).unwrap_or(key.as_str())))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Each item text-sanitized, blanks dropped; a lone scalar becomes a list.
fn sanitize_list(value: &Value) -> Value {
    Value::Array(
        string_items(value)
            .iter()
            .map(|item| sanitize_text(item))
            .filter(|item| !item.is_empty())
            .map(Value::String)
            .collect(),
    )
}

fn choice_input(input_type: &str, name: String, def: &FieldDef, key: &str, checked: bool) -> String {
    let input = Tag::new("input")
        .attr("type", input_type)
        .attr("name", name)
        .attr("value", key)
        .flag_if(checked, "checked")
        .void();
    Tag::new("label")
        .attr("class", format!("fw-{input_type}-option"))
        .html(&input)
        .text(&format!(" {}", def.option_label(key).unwrap_or(key)))
        .render()
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        ),
        _ => false,
    }
}

/// Drop-down with a single choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectField;

impl FieldType for SelectField {
    fn identifier(&self) -> &str {
        "select"
    }

    fn name(&self) -> &str {
        "Select"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().filterable().sortable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        let current = value_to_string(value);
        let prompt = if def.placeholder.is_empty() {
            "Select an option"
        } else {
            def.placeholder.as_str()
        };
        let mut options = Tag::new("option").attr("value", "").text(prompt).render();
        for (key, label) in &def.options {
            options.push_str(
                &Tag::new("option")
                    .attr("value", key.as_str())
                    .flag_if(*key == current, "selected")
                    .text(label)
                    .render(),
            );
        }
        Tag::new("select")
            .attr("id", def.input_id())
            .attr("name", def.input_name())
            .attr_opt("class", &def.css_class)
            .flag_if(def.required, "required")
            .html(&options)
            .render()
    }

    fn format_for_display(&self, value: &Value, def: &FieldDef) -> String {
        display_one(value, def)
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_text)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        validate_one(value, def)
    }
}

/// Radio buttons with a single choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadioField;

impl FieldType for RadioField {
    fn identifier(&self) -> &str {
        "radio"
    }

    fn name(&self) -> &str {
        "Radio Buttons"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().filterable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        let current = value_to_string(value);
        let body: String = def
            .options
            .keys()
            .map(|key| choice_input("radio", def.input_name(), def, key, *key == current))
            .collect();
        Tag::new("div")
            .attr("id", def.input_id())
            .attr("class", "fw-radio-group")
            .attr("role", "radiogroup")
            .html(&body)
            .render()
    }

    fn format_for_display(&self, value: &Value, def: &FieldDef) -> String {
        display_one(value, def)
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_text)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        validate_one(value, def)
    }
}

/// Single on/off checkbox. A required checkbox must be checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxField;

impl FieldType for CheckboxField {
    fn identifier(&self) -> &str {
        "checkbox"
    }

    fn name(&self) -> &str {
        "Checkbox"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().filterable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        // Unchecked boxes are not submitted; the hidden input reports "0".
        let hidden = Tag::new("input")
            .attr("type", "hidden")
            .attr("name", def.input_name())
            .attr("value", "0")
            .void();
        let checkbox = Tag::new("input")
            .attr("type", "checkbox")
            .attr("id", def.input_id())
            .attr("name", def.input_name())
            .attr("value", "1")
            .attr_opt("class", &def.css_class)
            .flag_if(truthy(value), "checked")
            .flag_if(def.required, "required")
            .void();
        format!("{hidden}{checkbox}")
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        if truthy(value) {
            "Yes".to_string()
        } else {
            String::new()
        }
    }

    fn default_value(&self) -> Value {
        Value::Bool(false)
    }

    fn sanitize(&self, value: &Value) -> Value {
        Value::Bool(truthy(value))
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        if let Some(outcome) = check_presence(value, def) {
            return outcome;
        }
        if def.required && !truthy(value) {
            return Err(vec![required_message(def)]);
        }
        Ok(())
    }
}

/// Drop-down allowing several choices.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiSelectField;

impl FieldType for MultiSelectField {
    fn identifier(&self) -> &str {
        "multiselect"
    }

    fn name(&self) -> &str {
        "Multi Select"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().filterable().repeater()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        let selected = string_items(value);
        let options: String = def
            .options
            .iter()
            .map(|(key, label)| {
                Tag::new("option")
                    .attr("value", key.as_str())
                    .flag_if(selected.contains(key), "selected")
                    .text(label)
                    .render()
            })
            .collect();
        Tag::new("select")
            .attr("id", def.input_id())
            .attr("name", format!("{}[]", def.input_name()))
            .attr_opt("class", &def.css_class)
            .flag("multiple")
            .flag_if(def.required, "required")
            .html(&options)
            .render()
    }

    fn format_for_display(&self, value: &Value, def: &FieldDef) -> String {
        display_many(value, def)
    }

    fn default_value(&self) -> Value {
        Value::Array(Vec::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        sanitize_list(value)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        validate_many(value, def)
    }

    fn encode_for_storage(&self, value: &Value) -> Value {
        encode_list(value)
    }

    fn decode_from_storage(&self, raw: &Value) -> Value {
        decode_list(raw)
    }
}

/// A set of checkboxes allowing several choices.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckboxGroupField;

impl FieldType for CheckboxGroupField {
    fn identifier(&self) -> &str {
        "checkboxgroup"
    }

    fn name(&self) -> &str {
        "Checkbox Group"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().filterable().repeater()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        let checked = string_items(value);
        let name = format!("{}[]", def.input_name());
        let body: String = def
            .options
            .keys()
            .map(|key| choice_input("checkbox", name.clone(), def, key, checked.contains(key)))
            .collect();
        Tag::new("div")
            .attr("id", def.input_id())
            .attr("class", "fw-checkbox-group")
            .html(&body)
            .render()
    }

    fn format_for_display(&self, value: &Value, def: &FieldDef) -> String {
        display_many(value, def)
    }

    fn default_value(&self) -> Value {
        Value::Array(Vec::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        sanitize_list(value)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        validate_many(value, def)
    }

    fn encode_for_storage(&self, value: &Value) -> Value {
        encode_list(value)
    }

    fn decode_from_storage(&self, raw: &Value) -> Value {
        decode_list(raw)
    }
}
