use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FieldOutcome;
use crate::field_type::{check_presence, Capabilities, FieldType};
use crate::markup::Tag;
use crate::sanitize::{sanitize_email, sanitize_phone, sanitize_url};
use crate::types::FieldDef;
use crate::value::{is_empty_value, value_to_string, Value};

use super::{check_max_length, map_string, text_input};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)+$",
    )
    .expect("valid regex")
});

static HTTP_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://[^\s/$.?#][^\s]*$").expect("valid regex"));

const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

/// Email address.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailField;

impl FieldType for EmailField {
    fn identifier(&self) -> &str {
        "email"
    }

    fn name(&self) -> &str {
        "Email"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().searchable().filterable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        text_input("email", def, value)
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        if is_empty_value(value) {
            return String::new();
        }
        let address = value_to_string(value);
        Tag::new("a")
            .attr("href", format!("mailto:{address}"))
            .text(&address)
            .render()
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_email)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        if let Some(outcome) = check_presence(value, def) {
            return outcome;
        }
        let address = value_to_string(value);
        if !EMAIL.is_match(address.trim()) {
            return Err(vec![format!("{} must be a valid email address.", def.label)]);
        }
        check_max_length(&address, def)
    }
}

/// Web address.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlField;

impl FieldType for UrlField {
    fn identifier(&self) -> &str {
        "url"
    }

    fn name(&self) -> &str {
        "URL"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().searchable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        text_input("url", def, value)
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        if is_empty_value(value) {
            return String::new();
        }
        let url = sanitize_url(&value_to_string(value));
        if url.is_empty() {
            return String::new();
        }
        Tag::new("a")
            .attr("href", url.as_str())
            .attr("rel", "nofollow noopener")
            .attr("target", "_blank")
            .text(&url)
            .render()
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_url)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        if let Some(outcome) = check_presence(value, def) {
            return outcome;
        }
        let url = value_to_string(value);
        if !HTTP_URL.is_match(url.trim()) {
            return Err(vec![format!("{} must be a valid URL.", def.label)]);
        }
        check_max_length(&url, def)
    }
}

/// Telephone number. Formatting is free; the digit count is checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneField;

impl FieldType for PhoneField {
    fn identifier(&self) -> &str {
        "phone"
    }

    fn name(&self) -> &str {
        "Phone"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().searchable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        text_input("tel", def, value)
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        if is_empty_value(value) {
            return String::new();
        }
        let number = value_to_string(value);
        let dial: String = number
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        Tag::new("a")
            .attr("href", format!("tel:{dial}"))
            .text(&number)
            .render()
    }

    fn default_value(&self) -> Value {
        Value::String(String::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_phone)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        if let Some(outcome) = check_presence(value, def) {
            return outcome;
        }
        let number = value_to_string(value);
        let digits = number.chars().filter(char::is_ascii_digit).count();
        if !PHONE_DIGITS.contains(&digits) {
            return Err(vec![format!("{} must be a valid phone number.", def.label)]);
        }
        Ok(())
    }
}
