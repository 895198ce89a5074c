//! Whole-form wrappers for the three standard call sites.

use fieldworks_fields::markup::Tag;
use fieldworks_fields::{FieldRegistry, RecordId, RenderContext, ValidationErrors, Values};

use crate::groups::FieldGroup;
use crate::render::{RenderSelection, Renderer};

/// Name of the hidden token input on every form.
pub const TOKEN_FIELD: &str = "fw_token";

/// Value the host replaces with its own request token.
pub const TOKEN_PLACEHOLDER: &str = "{{fw_token}}";

/// Name of the hidden record id input on a submission form that edits an
/// existing record.
pub const RECORD_ID_FIELD: &str = "fw_record_id";

/// Optional inputs shared by the form wrappers.
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    pub record_id: Option<RecordId>,
    pub errors: ValidationErrors,
    /// When non-empty the form renders grouped
    pub groups: Vec<FieldGroup>,
    /// Values from a failed submission; they win over stored values
    pub submitted: Option<Values>,
    pub selection: Option<RenderSelection>,
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_id(mut self, record_id: RecordId) -> Self {
        self.record_id = Some(record_id);
        self
    }

    pub fn errors(mut self, errors: ValidationErrors) -> Self {
        self.errors = errors;
        self
    }

    pub fn group(mut self, group: FieldGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn submitted(mut self, submitted: Values) -> Self {
        self.submitted = Some(submitted);
        self
    }

    pub fn selection(mut self, selection: RenderSelection) -> Self {
        self.selection = Some(selection);
        self
    }
}

/// The admin editing form for a record.
pub fn editor_form(registry: &FieldRegistry, values: &Values, options: FormOptions) -> String {
    let body = form_body(registry, RenderContext::Editor, values, &options);
    registry
        .hooks()
        .notify_editor_rendered(options.record_id, values);

    Tag::new("div")
        .attr("class", "fw-form fw-form-editor")
        .html(&token_input())
        .html(&body)
        .render()
}

/// The public submission form.
///
/// Previously submitted values are redisplayed over `values`; a record id
/// adds a hidden input so the submission edits that record.
pub fn submission_form(registry: &FieldRegistry, values: &Values, options: FormOptions) -> String {
    let mut merged = values.clone();
    if let Some(submitted) = &options.submitted {
        for (name, value) in submitted {
            merged.insert(name.clone(), value.clone());
        }
    }

    let body = form_body(registry, RenderContext::PublicSubmission, &merged, &options);
    registry
        .hooks()
        .notify_public_rendered(options.record_id, &merged);

    let mut form = Tag::new("div")
        .attr("class", "fw-form fw-form-public")
        .html(&token_input());
    if let Some(record_id) = options.record_id {
        form = form.html(
            &Tag::new("input")
                .attr("type", "hidden")
                .attr("name", RECORD_ID_FIELD)
                .attr("value", record_id.to_string())
                .void(),
        );
    }
    form.html(&body).render()
}

/// Read-only `<dl>` of a record's values, or an empty string when nothing
/// is shown.
///
/// Admin-only fields are left out unless `selection` names fields explicitly.
pub fn display_list(
    registry: &FieldRegistry,
    values: &Values,
    selection: Option<&RenderSelection>,
    record_id: Option<RecordId>,
) -> String {
    let renderer = Renderer::new(registry, RenderContext::Display);
    let all = RenderSelection::all();
    let rows = renderer.render_many(values, selection.unwrap_or(&all), record_id);
    if rows.is_empty() {
        return rows;
    }
    Tag::new("dl")
        .attr("class", "fw-field-list")
        .html(&rows)
        .render()
}

fn form_body(
    registry: &FieldRegistry,
    context: RenderContext,
    values: &Values,
    options: &FormOptions,
) -> String {
    let mut renderer = Renderer::new(registry, context).with_errors(options.errors.clone());
    if options.groups.is_empty() {
        let all = RenderSelection::all();
        let selection = options.selection.as_ref().unwrap_or(&all);
        return renderer.render_many(values, selection, options.record_id);
    }
    for group in &options.groups {
        renderer.register_group(group.clone());
    }
    renderer.render_grouped(values, options.record_id)
}

fn token_input() -> String {
    Tag::new("input")
        .attr("type", "hidden")
        .attr("name", TOKEN_FIELD)
        .attr("value", TOKEN_PLACEHOLDER)
        .void()
}
