//! Extension points.
//!
//! A fixed set of typed callback lists. Filters receive a value and return a
//! value of the same shape; each registered filter sees the previous one's
//! output, in registration order. Notifications are fire-and-forget.
//!
//! ```rust,ignore
//! registry.hooks_mut().add_post_validate(|outcome, value, def, _ctx| {
//!     if def.name == "price" && value.as_f64() == Some(0.0) {
//!         return Err(vec!["Price cannot be zero.".into()]);
//!     }
//!     outcome
//! });
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::error::{FieldOutcome, ValidationErrors};
use crate::types::{FieldConfig, FieldDef, RenderContext};
use crate::value::{RecordId, Value, Values};

pub type FieldRegisteredHook = Box<dyn Fn(&FieldDef) + Send + Sync>;
pub type FieldUnregisteredHook = Box<dyn Fn(&str) + Send + Sync>;
pub type FieldDefFilter = Box<dyn Fn(FieldDef) -> FieldDef + Send + Sync>;
pub type ExternalFieldsFilter =
    Box<dyn Fn(IndexMap<String, FieldConfig>) -> IndexMap<String, FieldConfig> + Send + Sync>;
pub type PreValidateFilter = Box<dyn Fn(Value, &FieldDef, &str) -> Value + Send + Sync>;
pub type PostValidateFilter =
    Box<dyn Fn(FieldOutcome, &Value, &FieldDef, &str) -> FieldOutcome + Send + Sync>;
pub type BeforeValidateAllHook = Box<dyn Fn(&Values, &str) + Send + Sync>;
pub type AfterValidateAllHook = Box<dyn Fn(&mut ValidationErrors, &Values, &str) + Send + Sync>;
pub type SanitizedValuesFilter = Box<dyn Fn(Values, &str) -> Values + Send + Sync>;
pub type RenderedFieldFilter =
    Box<dyn Fn(String, &FieldDef, &Value, RenderContext) -> String + Send + Sync>;
pub type RenderedGroupFilter = Box<dyn Fn(String, &str, RenderContext) -> String + Send + Sync>;
pub type ShouldDisplayFilter =
    Box<dyn Fn(bool, &FieldDef, RenderContext, Option<RecordId>) -> bool + Send + Sync>;
pub type FormRenderedHook = Box<dyn Fn(Option<RecordId>, &Values) + Send + Sync>;

/// Every extension point the engine fires.
#[derive(Default)]
pub struct Hooks {
    field_registered: Vec<FieldRegisteredHook>,
    field_unregistered: Vec<FieldUnregisteredHook>,
    field_config: Vec<FieldDefFilter>,
    field_read: Vec<FieldDefFilter>,
    external_fields: Vec<ExternalFieldsFilter>,
    pre_validate: Vec<PreValidateFilter>,
    post_validate: Vec<PostValidateFilter>,
    before_validate_all: Vec<BeforeValidateAllHook>,
    after_validate_all: Vec<AfterValidateAllHook>,
    sanitized_values: Vec<SanitizedValuesFilter>,
    rendered_field: Vec<RenderedFieldFilter>,
    rendered_group: Vec<RenderedGroupFilter>,
    should_display: Vec<ShouldDisplayFilter>,
    editor_rendered: Vec<FormRenderedHook>,
    public_rendered: Vec<FormRenderedHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Registration ---

    /// After a field definition is stored.
    pub fn on_field_registered(&mut self, f: impl Fn(&FieldDef) + Send + Sync + 'static) {
        self.field_registered.push(Box::new(f));
    }

    /// After a field definition is removed.
    pub fn on_field_unregistered(&mut self, f: impl Fn(&str) + Send + Sync + 'static) {
        self.field_unregistered.push(Box::new(f));
    }

    /// Rewrite a definition before it is stored.
    pub fn add_field_config(&mut self, f: impl Fn(FieldDef) -> FieldDef + Send + Sync + 'static) {
        self.field_config.push(Box::new(f));
    }

    /// Rewrite a definition each time it is read back.
    pub fn add_field_read(&mut self, f: impl Fn(FieldDef) -> FieldDef + Send + Sync + 'static) {
        self.field_read.push(Box::new(f));
    }

    /// Contribute fields from outside the host's own configuration.
    pub fn add_external_fields(
        &mut self,
        f: impl Fn(IndexMap<String, FieldConfig>) -> IndexMap<String, FieldConfig>
            + Send
            + Sync
            + 'static,
    ) {
        self.external_fields.push(Box::new(f));
    }

    // --- Validation ---

    pub fn add_pre_validate(
        &mut self,
        f: impl Fn(Value, &FieldDef, &str) -> Value + Send + Sync + 'static,
    ) {
        self.pre_validate.push(Box::new(f));
    }

    pub fn add_post_validate(
        &mut self,
        f: impl Fn(FieldOutcome, &Value, &FieldDef, &str) -> FieldOutcome + Send + Sync + 'static,
    ) {
        self.post_validate.push(Box::new(f));
    }

    pub fn on_before_validate_all(&mut self, f: impl Fn(&Values, &str) + Send + Sync + 'static) {
        self.before_validate_all.push(Box::new(f));
    }

    /// Cross-field rules: receives the aggregate error set mutably.
    pub fn on_after_validate_all(
        &mut self,
        f: impl Fn(&mut ValidationErrors, &Values, &str) + Send + Sync + 'static,
    ) {
        self.after_validate_all.push(Box::new(f));
    }

    pub fn add_sanitized_values(&mut self, f: impl Fn(Values, &str) -> Values + Send + Sync + 'static) {
        self.sanitized_values.push(Box::new(f));
    }

    // --- Rendering ---

    pub fn add_rendered_field(
        &mut self,
        f: impl Fn(String, &FieldDef, &Value, RenderContext) -> String + Send + Sync + 'static,
    ) {
        self.rendered_field.push(Box::new(f));
    }

    pub fn add_rendered_group(
        &mut self,
        f: impl Fn(String, &str, RenderContext) -> String + Send + Sync + 'static,
    ) {
        self.rendered_group.push(Box::new(f));
    }

    /// Override field visibility; the input is the engine's own decision.
    pub fn add_should_display(
        &mut self,
        f: impl Fn(bool, &FieldDef, RenderContext, Option<RecordId>) -> bool + Send + Sync + 'static,
    ) {
        self.should_display.push(Box::new(f));
    }

    pub fn on_editor_rendered(
        &mut self,
        f: impl Fn(Option<RecordId>, &Values) + Send + Sync + 'static,
    ) {
        self.editor_rendered.push(Box::new(f));
    }

    pub fn on_public_rendered(
        &mut self,
        f: impl Fn(Option<RecordId>, &Values) + Send + Sync + 'static,
    ) {
        self.public_rendered.push(Box::new(f));
    }

    // --- Firing ---

    pub fn notify_field_registered(&self, def: &FieldDef) {
        for hook in &self.field_registered {
            hook(def);
        }
    }

    pub fn notify_field_unregistered(&self, name: &str) {
        for hook in &self.field_unregistered {
            hook(name);
        }
    }

    pub fn apply_field_config(&self, def: FieldDef) -> FieldDef {
        self.field_config.iter().fold(def, |def, filter| filter(def))
    }

    pub fn apply_field_read(&self, def: FieldDef) -> FieldDef {
        self.field_read.iter().fold(def, |def, filter| filter(def))
    }

    pub fn apply_external_fields(&self) -> IndexMap<String, FieldConfig> {
        self.external_fields
            .iter()
            .fold(IndexMap::new(), |fields, filter| filter(fields))
    }

    pub fn apply_pre_validate(&self, value: Value, def: &FieldDef, context: &str) -> Value {
        self.pre_validate
            .iter()
            .fold(value, |value, filter| filter(value, def, context))
    }

    pub fn apply_post_validate(
        &self,
        outcome: FieldOutcome,
        value: &Value,
        def: &FieldDef,
        context: &str,
    ) -> FieldOutcome {
        self.post_validate
            .iter()
            .fold(outcome, |outcome, filter| filter(outcome, value, def, context))
    }

    pub fn notify_before_validate_all(&self, values: &Values, context: &str) {
        for hook in &self.before_validate_all {
            hook(values, context);
        }
    }

    pub fn apply_after_validate_all(
        &self,
        errors: &mut ValidationErrors,
        values: &Values,
        context: &str,
    ) {
        for hook in &self.after_validate_all {
            hook(errors, values, context);
        }
    }

    pub fn apply_sanitized_values(&self, values: Values, context: &str) -> Values {
        self.sanitized_values
            .iter()
            .fold(values, |values, filter| filter(values, context))
    }

    pub fn apply_rendered_field(
        &self,
        html: String,
        def: &FieldDef,
        value: &Value,
        context: RenderContext,
    ) -> String {
        self.rendered_field
            .iter()
            .fold(html, |html, filter| filter(html, def, value, context))
    }

    pub fn apply_rendered_group(&self, html: String, group_id: &str, context: RenderContext) -> String {
        self.rendered_group
            .iter()
            .fold(html, |html, filter| filter(html, group_id, context))
    }

    pub fn apply_should_display(
        &self,
        show: bool,
        def: &FieldDef,
        context: RenderContext,
        record_id: Option<RecordId>,
    ) -> bool {
        self.should_display
            .iter()
            .fold(show, |show, filter| filter(show, def, context, record_id))
    }

    pub fn notify_editor_rendered(&self, record_id: Option<RecordId>, values: &Values) {
        for hook in &self.editor_rendered {
            hook(record_id, values);
        }
    }

    pub fn notify_public_rendered(&self, record_id: Option<RecordId>, values: &Values) {
        for hook in &self.public_rendered {
            hook(record_id, values);
        }
    }

    /// Drop every registered callback.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("field_registered", &self.field_registered.len())
            .field("field_unregistered", &self.field_unregistered.len())
            .field("field_config", &self.field_config.len())
            .field("field_read", &self.field_read.len())
            .field("external_fields", &self.external_fields.len())
            .field("pre_validate", &self.pre_validate.len())
            .field("post_validate", &self.post_validate.len())
            .field("before_validate_all", &self.before_validate_all.len())
            .field("after_validate_all", &self.after_validate_all.len())
            .field("sanitized_values", &self.sanitized_values.len())
            .field("rendered_field", &self.rendered_field.len())
            .field("rendered_group", &self.rendered_group.len())
            .field("should_display", &self.should_display.len())
            .field("editor_rendered", &self.editor_rendered.len())
            .field("public_rendered", &self.public_rendered.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn def(name: &str) -> FieldDef {
        FieldDef::from_config(name, FieldConfig::new("text"))
    }

    #[test]
    fn filters_chain_in_registration_order() {
        let mut hooks = Hooks::new();
        hooks.add_rendered_field(|html, _, _, _| format!("{html}-a"));
        hooks.add_rendered_field(|html, _, _, _| format!("{html}-b"));
        let out = hooks.apply_rendered_field("x".into(), &def("f"), &json!(""), RenderContext::Editor);
        assert_eq!(out, "x-a-b");
    }

    #[test]
    fn empty_filters_pass_through() {
        let hooks = Hooks::new();
        assert_eq!(hooks.apply_pre_validate(json!(3), &def("f"), "default"), json!(3));
        assert!(hooks.apply_should_display(true, &def("f"), RenderContext::Display, None));
        assert!(hooks.apply_external_fields().is_empty());
    }

    #[test]
    fn post_validate_can_veto() {
        let mut hooks = Hooks::new();
        hooks.add_post_validate(|outcome, value, _, _| {
            if value == &json!("forbidden") {
                Err(vec!["Nope.".into()])
            } else {
                outcome
            }
        });
        let d = def("f");
        assert!(hooks.apply_post_validate(Ok(()), &json!("ok"), &d, "x").is_ok());
        assert_eq!(
            hooks.apply_post_validate(Ok(()), &json!("forbidden"), &d, "x"),
            Err(vec!["Nope.".to_string()])
        );
    }

    #[test]
    fn notifications_fire_every_listener() {
        let mut hooks = Hooks::new();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let count = Arc::clone(&count);
            hooks.on_field_unregistered(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }
        hooks.notify_field_unregistered("f");
        assert_eq!(count.load(Ordering::SeqCst), 2);

        hooks.clear();
        hooks.notify_field_unregistered("f");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn debug_reports_counts() {
        let mut hooks = Hooks::new();
        hooks.add_field_read(|d| d);
        let debug = format!("{hooks:?}");
        assert!(debug.contains("field_read: 1"));
    }
}
