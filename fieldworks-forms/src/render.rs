//! Renders fields for the editor, the public submission form and read-only
//! display.
//!
//! Interactive contexts wrap each control in a labelled container carrying
//! `data-field-name` and `data-field-type`; display renders `<dt>`/`<dd>`
//! pairs and skips empty values entirely.

use std::collections::HashSet;

use fieldworks_fields::markup::{esc, Tag};
use fieldworks_fields::{
    is_empty_value, FieldDef, FieldQuery, FieldRegistry, FieldType, RecordId, RenderContext,
    ValidationErrors, Value, Values,
};

use crate::groups::{FieldGroup, GroupSet};

/// Which fields [`Renderer::render_many`] emits.
///
/// By default every registered field in priority order. An explicit list is
/// rendered in its own order; `exclude` is subtracted either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSelection {
    pub fields: Option<Vec<String>>,
    pub exclude: Vec<String>,
}

impl RenderSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: Some(fields.into_iter().map(Into::into).collect()),
            exclude: Vec::new(),
        }
    }

    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn is_explicit(&self) -> bool {
        self.fields.is_some()
    }
}

/// Per-request renderer over a shared registry.
#[derive(Debug, Clone)]
pub struct Renderer<'r> {
    registry: &'r FieldRegistry,
    context: RenderContext,
    errors: ValidationErrors,
    groups: GroupSet,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r FieldRegistry, context: RenderContext) -> Self {
        Self {
            registry,
            context,
            errors: ValidationErrors::new(),
            groups: GroupSet::new(),
        }
    }

    /// Errors to show next to their fields, typically from a failed submission.
    pub fn with_errors(mut self, errors: ValidationErrors) -> Self {
        self.errors = errors;
        self
    }

    pub fn context(&self) -> RenderContext {
        self.context
    }

    // --- Groups ---

    pub fn register_group(&mut self, group: FieldGroup) -> bool {
        self.groups.register(group)
    }

    pub fn unregister_group(&mut self, id: &str) -> bool {
        self.groups.unregister(id)
    }

    pub fn list_groups(&self) -> Vec<&FieldGroup> {
        self.groups.list()
    }

    // --- Rendering ---

    /// Markup for one field, or an empty string when it is unknown, hidden in
    /// this context, or (in display) empty.
    ///
    /// A missing `value` falls back to the field's default, then the kind's.
    pub fn render_field(
        &self,
        name: &str,
        value: Option<&Value>,
        record_id: Option<RecordId>,
    ) -> String {
        self.render_one(name, value, record_id, false)
    }

    /// Concatenated markup for a selection of fields.
    ///
    /// Admin-only fields render only in the editor, except that an explicit
    /// selection may name them for display.
    pub fn render_many(
        &self,
        values: &Values,
        selection: &RenderSelection,
        record_id: Option<RecordId>,
    ) -> String {
        let explicit = selection.is_explicit();
        self.selected_names(selection)
            .iter()
            .map(|name| self.render_one(name, values.get(name), record_id, explicit))
            .collect()
    }

    /// Groups in priority order, then every field no group claims.
    pub fn render_grouped(&self, values: &Values, record_id: Option<RecordId>) -> String {
        let hooks = self.registry.hooks();
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut out = String::new();

        for group in self.groups.list() {
            claimed.extend(group.fields.iter().map(String::as_str));
            let body: String = group
                .fields
                .iter()
                .map(|name| self.render_one(name, values.get(name), record_id, false))
                .collect();
            if body.trim().is_empty() {
                continue;
            }
            let html = self.group_wrapper(group, &body);
            out.push_str(&hooks.apply_rendered_group(html, &group.id, self.context));
        }

        let rest = RenderSelection::all().exclude(claimed);
        out.push_str(&self.render_many(values, &rest, record_id));
        out
    }

    fn selected_names(&self, selection: &RenderSelection) -> Vec<String> {
        let names: Vec<String> = match &selection.fields {
            Some(fields) => fields.clone(),
            None => self.registry.list(&FieldQuery::new()).into_keys().collect(),
        };
        names
            .into_iter()
            .filter(|name| !selection.exclude.contains(name))
            .collect()
    }

    fn visible(&self, def: &FieldDef, record_id: Option<RecordId>, explicit: bool) -> bool {
        let show = match self.context {
            RenderContext::Editor => true,
            RenderContext::Display => !def.admin_only || explicit,
            RenderContext::PublicSubmission => !def.admin_only,
        };
        self.registry
            .hooks()
            .apply_should_display(show, def, self.context, record_id)
    }

    fn render_one(
        &self,
        name: &str,
        value: Option<&Value>,
        record_id: Option<RecordId>,
        explicit: bool,
    ) -> String {
        let Some(def) = self.registry.get(name) else {
            return String::new();
        };
        let Some(kind) = self.registry.types().get(&def.field_type) else {
            return String::new();
        };
        if !self.visible(&def, record_id, explicit) {
            return String::new();
        }

        let value = match value {
            Some(value) => value.clone(),
            None => def.default.clone().unwrap_or_else(|| kind.default_value()),
        };
        let html = match self.context {
            RenderContext::Display => display_row(&def, kind.as_ref(), &value),
            RenderContext::Editor | RenderContext::PublicSubmission => {
                self.field_wrapper(&def, kind.as_ref(), &value)
            }
        };
        if html.is_empty() {
            return html;
        }
        self.registry
            .hooks()
            .apply_rendered_field(html, &def, &value, self.context)
    }

    fn field_wrapper(&self, def: &FieldDef, kind: &dyn FieldType, value: &Value) -> String {
        let errors = self.errors.get(&def.name).unwrap_or_default();
        let mut class = format!("fw-field fw-field-{}", def.field_type);
        if !errors.is_empty() {
            class.push_str(" fw-has-error");
        }

        let mut body = String::new();
        if def.field_type != "hidden" {
            let mut label = Tag::new("label")
                .attr("for", def.input_id())
                .attr("class", "fw-label")
                .text(&def.label);
            if def.required {
                label = label.html(
                    &Tag::new("span")
                        .attr("class", "fw-required")
                        .attr("aria-hidden", "true")
                        .text("*")
                        .render(),
                );
            }
            body.push_str(&label.render());
        }
        body.push_str(&kind.render(def, value));
        if !def.description.is_empty() {
            body.push_str(
                &Tag::new("p")
                    .attr("id", format!("{}-description", def.input_id()))
                    .attr("class", "fw-description")
                    .text(&def.description)
                    .render(),
            );
        }
        if !errors.is_empty() {
            let messages: String = errors
                .iter()
                .map(|message| Tag::new("p").attr("class", "fw-error").text(message).render())
                .collect();
            body.push_str(
                &Tag::new("div")
                    .attr("class", "fw-field-errors")
                    .attr("role", "alert")
                    .html(&messages)
                    .render(),
            );
        }

        Tag::new("div")
            .attr("class", class)
            .attr("data-field-name", def.name.as_str())
            .attr("data-field-type", def.field_type.as_str())
            .html(&body)
            .render()
    }

    fn group_wrapper(&self, group: &FieldGroup, body: &str) -> String {
        let description = if group.description.is_empty() {
            String::new()
        } else {
            Tag::new("p")
                .attr("class", "fw-group-description")
                .text(&group.description)
                .render()
        };

        if !self.context.is_interactive() {
            return Tag::new("div")
                .attr("class", "fw-group")
                .attr("data-group-id", group.id.as_str())
                .html(&Tag::new("h3").attr("class", "fw-group-title").text(&group.title).render())
                .html(body)
                .render();
        }

        if group.collapsible {
            Tag::new("details")
                .attr("class", "fw-group")
                .attr("data-group-id", group.id.as_str())
                .flag_if(!group.collapsed, "open")
                .html(&Tag::new("summary").text(&group.title).render())
                .html(&description)
                .html(body)
                .render()
        } else {
            Tag::new("fieldset")
                .attr("class", "fw-group")
                .attr("data-group-id", group.id.as_str())
                .html(&Tag::new("legend").text(&group.title).render())
                .html(&description)
                .html(body)
                .render()
        }
    }
}

/// `<dt>`/`<dd>` pair, or nothing for an empty value.
fn display_row(def: &FieldDef, kind: &dyn FieldType, value: &Value) -> String {
    if is_empty_value(value) {
        return String::new();
    }
    let formatted = kind.format_for_display(value, def);
    if formatted.trim().is_empty() {
        return String::new();
    }
    Tag::new("div")
        .attr("class", format!("fw-display-field fw-display-{}", def.field_type))
        .attr("data-field-name", def.name.as_str())
        .attr("data-field-type", def.field_type.as_str())
        .html(&format!(
            r#"<dt class="fw-display-label">{}</dt><dd class="fw-display-value">{}</dd>"#,
            esc(&def.label),
            formatted
        ))
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldworks_fields::FieldConfig;
    use serde_json::json;

    fn registry() -> FieldRegistry {
        let mut reg = FieldRegistry::with_builtin_types();
        reg.register(
            "title",
            FieldConfig::new("text").required().priority(1).description("Shown in lists"),
        )
        .unwrap();
        reg.register("notes", FieldConfig::new("textarea").admin_only())
            .unwrap();
        reg.register("city", FieldConfig::new("text").default_value(json!("Springfield")))
            .unwrap();
        reg
    }

    #[test]
    fn editor_wrapper_carries_label_and_data_attributes() {
        let reg = registry();
        let html = Renderer::new(&reg, RenderContext::Editor).render_field(
            "title",
            Some(&json!("Hi")),
            None,
        );
        assert!(html.starts_with(
            r#"<div class="fw-field fw-field-text" data-field-name="title" data-field-type="text">"#
        ));
        assert!(html.contains(r#"<label for="field-title" class="fw-label">Title<span class="fw-required" aria-hidden="true">*</span></label>"#));
        assert!(html.contains(r#"<p id="field-title-description" class="fw-description">Shown in lists</p>"#));
        assert!(html.contains(r#"value="Hi""#));
    }

    #[test]
    fn injected_errors_render_as_alert() {
        let reg = registry();
        let mut errors = ValidationErrors::new();
        errors.add("title", "Title is required.");
        let html = Renderer::new(&reg, RenderContext::PublicSubmission)
            .with_errors(errors)
            .render_field("title", None, None);
        assert!(html.contains("fw-has-error"));
        assert!(html.contains(
            r#"<div class="fw-field-errors" role="alert"><p class="fw-error">Title is required.</p></div>"#
        ));
    }

    #[test]
    fn admin_only_hidden_outside_editor() {
        let reg = registry();
        let values = Values::new();
        let editor = Renderer::new(&reg, RenderContext::Editor);
        let public = Renderer::new(&reg, RenderContext::PublicSubmission);
        assert!(!editor.render_field("notes", None, None).is_empty());
        assert!(public.render_field("notes", None, None).is_empty());
        assert!(!public
            .render_many(&values, &RenderSelection::all(), None)
            .contains("notes"));
    }

    #[test]
    fn should_display_hook_can_force_visibility() {
        let mut reg = registry();
        reg.hooks_mut()
            .add_should_display(|show, def, _, record| show || (def.name == "notes" && record == Some(9)));
        let public = Renderer::new(&reg, RenderContext::PublicSubmission);
        assert!(public.render_field("notes", None, Some(1)).is_empty());
        assert!(!public.render_field("notes", None, Some(9)).is_empty());
    }

    #[test]
    fn missing_value_uses_field_default() {
        let reg = registry();
        let html = Renderer::new(&reg, RenderContext::Editor).render_field("city", None, None);
        assert!(html.contains(r#"value="Springfield""#));
    }

    #[test]
    fn display_skips_empty_values() {
        let reg = registry();
        let display = Renderer::new(&reg, RenderContext::Display);
        assert_eq!(display.render_field("title", Some(&json!("  ")), None), "");
        assert_eq!(
            display.render_field("title", Some(&json!("Fish & Chips")), None),
            r#"<div class="fw-display-field fw-display-text" data-field-name="title" data-field-type="text"><dt class="fw-display-label">Title</dt><dd class="fw-display-value">Fish &amp; Chips</dd></div>"#
        );
    }

    #[test]
    fn display_explicit_selection_may_name_admin_fields() {
        let reg = registry();
        let display = Renderer::new(&reg, RenderContext::Display);
        let mut values = Values::new();
        values.insert("notes".into(), json!("private"));
        assert_eq!(display.render_many(&values, &RenderSelection::all(), None), "");
        assert!(display
            .render_many(&values, &RenderSelection::only(["notes"]), None)
            .contains("private"));
    }

    #[test]
    fn unknown_field_renders_nothing() {
        let reg = registry();
        assert_eq!(
            Renderer::new(&reg, RenderContext::Editor).render_field("nope", None, None),
            ""
        );
    }

    #[test]
    fn render_many_follows_priority_and_exclude() {
        let reg = registry();
        let html = Renderer::new(&reg, RenderContext::Editor).render_many(
            &Values::new(),
            &RenderSelection::all().exclude(["city"]),
            None,
        );
        let title = html.find(r#"data-field-name="title""#).unwrap();
        let notes = html.find(r#"data-field-name="notes""#).unwrap();
        assert!(title < notes);
        assert!(!html.contains(r#"data-field-name="city""#));
    }

    #[test]
    fn rendered_field_filter_applies() {
        let mut reg = registry();
        reg.hooks_mut()
            .add_rendered_field(|html, def, _, ctx| format!("<!-- {} {} -->{html}", def.name, ctx));
        let html = Renderer::new(&reg, RenderContext::Editor).render_field("title", None, None);
        assert!(html.starts_with("<!-- title editor -->"));
    }

    #[test]
    fn display_skips_groups_whose_members_are_all_empty() {
        let reg = registry();
        let mut display = Renderer::new(&reg, RenderContext::Display);
        display.register_group(FieldGroup::new("where", "Where").field("city"));
        display.register_group(FieldGroup::new("what", "What").field("title"));

        let mut values = Values::new();
        values.insert("city".into(), json!(""));
        values.insert("title".into(), json!("Fair"));
        let html = display.render_grouped(&values, None);

        assert!(!html.contains(r#"data-group-id="where""#));
        assert!(html.starts_with(r#"<div class="fw-group" data-group-id="what"><h3 class="fw-group-title">What</h3>"#));
        assert_eq!(html.matches(r#"data-field-name="title""#).count(), 1);
    }

    #[test]
    fn collapsed_groups_render_closed() {
        let reg = registry();
        let mut editor = Renderer::new(&reg, RenderContext::Editor);
        editor.register_group(FieldGroup::new("open", "Open").field("title"));
        editor.register_group(
            FieldGroup::new("closed", "Closed")
                .collapsed(true)
                .priority(20)
                .field("city"),
        );
        let html = editor.render_grouped(&Values::new(), None);

        assert!(html.contains(r#"<details class="fw-group" data-group-id="open" open><summary>Open</summary>"#));
        assert!(html.contains(r#"<details class="fw-group" data-group-id="closed"><summary>Closed</summary>"#));
        assert!(html.find(r#"data-group-id="open""#) < html.find(r#"data-group-id="closed""#));
    }

    #[test]
    fn rendered_group_filter_applies() {
        let mut reg = registry();
        reg.hooks_mut()
            .add_rendered_group(|html, id, ctx| format!("<section data-wrap=\"{id}-{ctx}\">{html}</section>"));
        let mut editor = Renderer::new(&reg, RenderContext::Editor);
        editor.register_group(FieldGroup::new("basics", "Basics").field("title"));

        let html = editor.render_grouped(&Values::new(), None);
        assert!(html.starts_with(r#"<section data-wrap="basics-editor"><details"#));
        assert!(html.contains("</details></section>"));
    }
}
