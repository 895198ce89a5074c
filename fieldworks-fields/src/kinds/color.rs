use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FieldOutcome;
use crate::field_type::{check_presence, FieldType};
use crate::markup::Tag;
use crate::types::FieldDef;
use crate::value::{is_empty_value, value_to_string, Value};

use super::{map_string, text_input};

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-f]{3}|[0-9a-f]{6})$").expect("valid regex"));

fn clean_color(raw: &str) -> String {
    let trimmed = raw.trim().to_ascii_lowercase();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        trimmed
    } else {
        format!("#{trimmed}")
    }
}

/// Hex colour, `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorField;

impl FieldType for ColorField {
    fn identifier(&self) -> &str {
        "color"
    }

    fn name(&self) -> &str {
        "Color"
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        text_input("color", def, value)
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        if is_empty_value(value) {
            return String::new();
        }
        let color = clean_color(&value_to_string(value));
        if !HEX_COLOR.is_match(&color) {
            return String::new();
        }
        let swatch = Tag::new("span")
            .attr("class", "fw-color-swatch")
            .attr("style", format!("background-color: {color}"))
            .render();
        Tag::new("span")
            .attr("class", "fw-color")
            .html(&swatch)
            .text(&format!(" {color}"))
            .render()
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, clean_color)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        if let Some(outcome) = check_presence(value, def) {
            return outcome;
        }
        if HEX_COLOR.is_match(&value_to_string(value).to_ascii_lowercase()) {
            Ok(())
        } else {
            Err(vec![format!("{} must be a hex color such as #1a2b3c.", def.label)])
        }
    }
}
