//! Escaping and a small element builder for rendered fragments.
//!
//! Every interpolated value goes through [`esc`] or [`esc_attr`]. [`Tag`]
//! escapes attribute values itself; bodies passed to [`Tag::html`] must
//! already be safe markup, bodies passed to [`Tag::text`] are escaped.

use html_escape::{encode_double_quoted_attribute, encode_text};

/// Escape text content.
pub fn esc(text: &str) -> String {
    encode_text(text).into_owned()
}

/// Escape a double-quoted attribute value.
pub fn esc_attr(text: &str) -> String {
    encode_double_quoted_attribute(text).into_owned()
}

/// Format a number for an attribute, without a trailing `.0` on whole numbers.
pub fn fmt_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// An HTML element under construction.
#[derive(Debug, Clone)]
pub struct Tag {
    name: &'static str,
    attrs: Vec<(String, Option<String>)>,
    body: String,
}

impl Tag {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attrs: Vec::new(),
            body: String::new(),
        }
    }

    /// Add an attribute; the value is escaped on render.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), Some(value.into())));
        self
    }

    /// Add an attribute only when `value` is non-empty.
    pub fn attr_opt(self, key: impl Into<String>, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.attr(key, value)
        }
    }

    /// Add a boolean attribute such as `required` or `checked`.
    pub fn flag(mut self, key: impl Into<String>) -> Self {
        self.attrs.push((key.into(), None));
        self
    }

    pub fn flag_if(self, condition: bool, key: impl Into<String>) -> Self {
        if condition {
            self.flag(key)
        } else {
            self
        }
    }

    /// Append pre-escaped markup to the body.
    pub fn html(mut self, markup: &str) -> Self {
        self.body.push_str(markup);
        self
    }

    /// Append text to the body, escaping it.
    pub fn text(mut self, text: &str) -> Self {
        self.body.push_str(&esc(text));
        self
    }

    fn open(&self) -> String {
        let mut out = format!("<{}", self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&esc_attr(value));
                out.push('"');
            }
        }
        out.push('>');
        out
    }

    /// Render as a void element (`<input …>`); any body is ignored.
    pub fn void(self) -> String {
        self.open()
    }

    /// Render with body and closing tag.
    pub fn render(self) -> String {
        format!("{}{}</{}>", self.open(), self.body, self.name)
    }
}
