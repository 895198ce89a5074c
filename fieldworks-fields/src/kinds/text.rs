use crate::error::FieldOutcome;
use crate::field_type::{check_presence, Capabilities, FieldType};
use crate::markup::{esc, Tag};
use crate::sanitize::{sanitize_rich_text, sanitize_text, sanitize_textarea, strip_tags};
use crate::types::FieldDef;
use crate::value::{is_empty_value, value_to_string, Value};

use super::{base_input, check_max_length, map_string, text_input};

fn validate_length(value: &Value, def: &FieldDef) -> FieldOutcome {
    if let Some(outcome) = check_presence(value, def) {
        return outcome;
    }
    check_max_length(&value_to_string(value), def)
}

fn textarea(def: &FieldDef, value: &Value, class: &str) -> String {
    let classes = [class, def.css_class.as_str()]
        .iter()
        .filter(|c| !c.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let mut tag = Tag::new("textarea")
        .attr("id", def.input_id())
        .attr("name", def.input_name())
        .attr("rows", def.rows.unwrap_or(5).to_string())
        .attr_opt("placeholder", &def.placeholder)
        .attr_opt("class", &classes)
        .flag_if(def.required, "required");
    if let Some(max_length) = def.max_length {
        tag = tag.attr("maxlength", max_length.to_string());
    }
    tag.text(&value_to_string(value)).render()
}

/// Single-line text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextField;

impl FieldType for TextField {
    fn identifier(&self) -> &str {
        "text"
    }

    fn name(&self) -> &str {
        "Text"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().searchable().filterable().sortable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        text_input("text", def, value)
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        if is_empty_value(value) {
            return String::new();
        }
        esc(&value_to_string(value))
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_text)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        validate_length(value, def)
    }
}

/// Multi-line plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextareaField;

impl FieldType for TextareaField {
    fn identifier(&self) -> &str {
        "textarea"
    }

    fn name(&self) -> &str {
        "Textarea"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().searchable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        textarea(def, value, "")
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        if is_empty_value(value) {
            return String::new();
        }
        esc(&value_to_string(value)).replace('\n', "<br>\n")
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_textarea)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        validate_length(value, def)
    }
}

/// Formatted text; markup is kept but executable content is removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichTextField;

impl FieldType for RichTextField {
    fn identifier(&self) -> &str {
        "richtext"
    }

    fn name(&self) -> &str {
        "Rich Text"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().searchable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        textarea(def, value, "fw-richtext")
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        if is_empty_value(value) {
            return String::new();
        }
        sanitize_rich_text(&value_to_string(value))
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_rich_text)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        if let Some(outcome) = check_presence(value, def) {
            return outcome;
        }
        // Length counts visible text only.
        check_max_length(&strip_tags(&value_to_string(value)), def)
    }
}

/// Value carried through the form without a visible control.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenField;

impl FieldType for HiddenField {
    fn identifier(&self) -> &str {
        "hidden"
    }

    fn name(&self) -> &str {
        "Hidden"
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        Tag::new("input")
            .attr("type", "hidden")
            .attr("id", def.input_id())
            .attr("name", def.input_name())
            .attr("value", value_to_string(value))
            .void()
    }

    fn format_for_display(&self, _value: &Value, _def: &FieldDef) -> String {
        String::new()
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_text)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        validate_length(value, def)
    }
}

/// Secret text. Never redisplayed and never shown read-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordField;

impl FieldType for PasswordField {
    fn identifier(&self) -> &str {
        "password"
    }

    fn name(&self) -> &str {
        "Password"
    }

    fn render(&self, def: &FieldDef, _value: &Value) -> String {
        base_input("password", def, "")
            .attr("autocomplete", "new-password")
            .void()
    }

    fn format_for_display(&self, _value: &Value, _def: &FieldDef) -> String {
        String::new()
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, |s| s.trim().to_string())
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        validate_length(value, def)
    }
}
