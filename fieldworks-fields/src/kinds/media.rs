//! Kinds that reference uploaded media by URL.
//!
//! The engine never handles uploads; it stores the URL the host's media
//! library returned and checks its extension against `accept`.

use crate::error::FieldOutcome;
use crate::field_type::{check_presence, Capabilities, FieldType};
use crate::markup::Tag;
use crate::sanitize::{file_extension, sanitize_url};
use crate::types::FieldDef;
use crate::value::{is_empty_value, string_items, value_to_string, Value};

use super::{base_input, decode_list, encode_list, map_string};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "avif"];

fn allowed_extensions(def: &FieldDef, fallback: &[&str]) -> Vec<String> {
    if def.accept.is_empty() {
        fallback.iter().map(|ext| ext.to_string()).collect()
    } else {
        def.accept
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect()
    }
}

/// Whether `url` carries one of `allowed`. An empty list allows anything.
fn extension_allowed(url: &str, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    file_extension(url).is_some_and(|ext| allowed.contains(&ext))
}

fn file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => url,
    }
}

fn url_input(def: &FieldDef, value: &str, allowed: &[String]) -> Tag {
    base_input("url", def, value).attr_opt("data-accept", &allowed.join(","))
}

fn image_tag(url: &str, alt: &str) -> String {
    Tag::new("img")
        .attr("src", url)
        .attr("alt", alt)
        .attr("loading", "lazy")
        .void()
}

/// Any uploaded file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileField;

impl FieldType for FileField {
    fn identifier(&self) -> &str {
        "file"
    }

    fn name(&self) -> &str {
        "File"
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        url_input(def, &value_to_string(value), &allowed_extensions(def, &[])).void()
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
            .attr("class", "fw-file")
            .text(file_name(&url))
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
        let allowed = allowed_extensions(def, &[]);
        if extension_allowed(&value_to_string(value), &allowed) {
            Ok(())
        } else {
            Err(vec![format!(
                "{} must be a file of type: {}.",
                def.label,
                allowed.join(", ")
            )])
        }
    }
}

/// A single image.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageField;

impl FieldType for ImageField {
    fn identifier(&self) -> &str {
        "image"
    }

    fn name(&self) -> &str {
        "Image"
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        let url = value_to_string(value);
        let input = url_input(def, &url, &allowed_extensions(def, IMAGE_EXTENSIONS)).void();
        let safe = sanitize_url(&url);
        if safe.is_empty() {
            return input;
        }
        let preview = Tag::new("div")
            .attr("class", "fw-image-preview")
            .html(&image_tag(&safe, &def.label))
            .render();
        format!("{input}{preview}")
    }

    fn format_for_display(&self, value: &Value, def: &FieldDef) -> String {
        if is_empty_value(value) {
            return String::new();
        }
        let url = sanitize_url(&value_to_string(value));
        if url.is_empty() {
            return String::new();
        }
        image_tag(&url, &def.label)
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
        let allowed = allowed_extensions(def, IMAGE_EXTENSIONS);
        if extension_allowed(&value_to_string(value), &allowed) {
            Ok(())
        } else {
            Err(vec![format!(
                "{} must be an image of type: {}.",
                def.label,
                allowed.join(", ")
            )])
        }
    }
}

/// An ordered list of images.
#[derive(Debug, Clone, Copy, Default)]
pub struct GalleryField;

impl FieldType for GalleryField {
    fn identifier(&self) -> &str {
        "gallery"
    }

    fn name(&self) -> &str {
        "Gallery"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().repeater()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        let name = format!("{}[]", def.input_name());
        let inputs: String = string_items(value)
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(""))
            .map(|url| {
                Tag::new("input")
                    .attr("type", "url")
                    .attr("name", name.as_str())
                    .attr("value", url)
                    .void()
            })
            .collect();
        Tag::new("div")
            .attr("id", def.input_id())
            .attr("class", "fw-gallery-input")
            .attr_opt("data-accept", &allowed_extensions(def, IMAGE_EXTENSIONS).join(","))
            .html(&inputs)
            .render()
    }

    fn format_for_display(&self, value: &Value, def: &FieldDef) -> String {
        let items: String = string_items(value)
            .iter()
            .map(|url| sanitize_url(url))
            .filter(|url| !url.is_empty())
            .map(|url| Tag::new("li").html(&image_tag(&url, &def.label)).render())
            .collect();
        if items.is_empty() {
            return String::new();
        }
        Tag::new("ul").attr("class", "fw-gallery").html(&items).render()
    }

    fn default_value(&self) -> Value {
        Value::Array(Vec::new())
    }

    fn sanitize(&self, value: &Value) -> Value {
        Value::Array(
            string_items(value)
                .iter()
                .map(|url| sanitize_url(url))
                .filter(|url| !url.is_empty())
                .map(Value::String)
                .collect(),
        )
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        if let Some(outcome) = check_presence(value, def) {
            return outcome;
        }
        let allowed = allowed_extensions(def, IMAGE_EXTENSIONS);
        let errors: Vec<String> = string_items(value)
            .iter()
            .filter(|url| !extension_allowed(url, &allowed))
            .map(|url| format!("{}: \"{}\" is not an allowed image.", def.label, url))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn encode_for_storage(&self, value: &Value) -> Value {
        encode_list(value)
    }

    fn decode_from_storage(&self, raw: &Value) -> Value {
        decode_list(raw)
    }
}
