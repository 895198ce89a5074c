//! Sanitize and validate untrusted input against the field registry.
//!
//! Every expected failure is reported as data: a [`FieldOutcome`] for one
//! field, a [`ValidationErrors`] set for many.

use fieldworks_fields::{
    empty_sentinel, is_empty_value, required_message, sanitize_key, FieldOutcome, FieldQuery,
    FieldRegistry, FieldsError, ValidationErrors, Value, Values,
};
use serde::Serialize;
use tracing::trace;

/// The context passed to extension points when none is given.
pub const DEFAULT_CONTEXT: &str = "default";

/// Which fields a bulk operation covers.
///
/// The target set is `fields` if given, else every registered field, minus
/// `exclude`. Names are compared after the same normalization `register`
/// applies, so `Email` and `email` are one field. Names present in the input but not registered are skipped
/// unless `skip_unregistered` is turned off, in which case they are
/// validated too and reported as unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOptions {
    pub fields: Option<Vec<String>>,
    pub exclude: Vec<String>,
    pub skip_unregistered: bool,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            fields: None,
            exclude: Vec::new(),
            skip_unregistered: true,
        }
    }
}

impl BulkOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the operation to these fields, in this order.
    pub fn only<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn skip_unregistered(mut self, skip: bool) -> Self {
        self.skip_unregistered = skip;
        self
    }
}

/// Result of [`Validator::process`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessResult {
    pub valid: bool,
    pub values: Values,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

/// Per-request validator over a shared registry.
#[derive(Debug, Clone)]
pub struct Validator<'r> {
    registry: &'r FieldRegistry,
    context: String,
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r FieldRegistry) -> Self {
        Self {
            registry,
            context: DEFAULT_CONTEXT.to_string(),
        }
    }

    /// Set the free-form context string handed to extension points.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Validate one field's value.
    ///
    /// The required check runs on the raw value, before any sanitizing, so a
    /// blank required number is reported as missing rather than coerced to 0.
    pub fn validate_field(&self, name: &str, value: &Value, sanitize: bool) -> FieldOutcome {
        let Some(def) = self.registry.get(name) else {
            return Err(vec![FieldsError::FieldNotFound {
                name: name.to_string(),
            }
            .to_string()]);
        };
        let Some(kind) = self.registry.types().get(&def.field_type) else {
            return Err(vec![FieldsError::UnknownFieldType {
                field_type: def.field_type.clone(),
            }
            .to_string()]);
        };

        if def.required && is_empty_value(value) {
            return Err(vec![required_message(&def)]);
        }

        let hooks = self.registry.hooks();
        let value = if sanitize {
            kind.sanitize_with_field(value, &def)
        } else {
            value.clone()
        };
        let value = hooks.apply_pre_validate(value, &def, &self.context);
        let outcome = kind.validate(&value, &def);
        let outcome = hooks.apply_post_validate(outcome, &value, &def, &self.context);

        if let Err(messages) = &outcome {
            trace!(name = %def.name, ?messages, "field failed validation");
        }
        outcome
    }

    /// Validate every targeted field, sanitizing first.
    pub fn validate_many(
        &self,
        values: &Values,
        options: &BulkOptions,
    ) -> Result<(), ValidationErrors> {
        self.validate_targets(values, options, true)
    }

    fn validate_targets(
        &self,
        values: &Values,
        options: &BulkOptions,
        sanitize: bool,
    ) -> Result<(), ValidationErrors> {
        let hooks = self.registry.hooks();
        hooks.notify_before_validate_all(values, &self.context);

        let mut errors = ValidationErrors::new();
        for name in self.targets(values, options) {
            let value = input_value(values, &name).unwrap_or(&Value::Null);
            if let Err(messages) = self.validate_field(&name, value, sanitize) {
                errors.extend(&name, messages);
            }
        }

        hooks.apply_after_validate_all(&mut errors, values, &self.context);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Clean one field's value.
    ///
    /// Unknown fields pass through unchanged. A required field left empty
    /// becomes the empty value of its shape instead of going through the
    /// kind's sanitizer.
    pub fn sanitize_field(&self, name: &str, value: &Value) -> Value {
        let Some(def) = self.registry.get(name) else {
            return value.clone();
        };
        let Some(kind) = self.registry.types().get(&def.field_type) else {
            return value.clone();
        };
        if def.required && is_empty_value(value) {
            return empty_sentinel(value);
        }
        kind.sanitize_with_field(value, &def)
    }

    /// Clean every supplied value in the target set, in input order.
    ///
    /// Output keys are the normalized field names.
    pub fn sanitize_many(&self, values: &Values, options: &BulkOptions) -> Values {
        let targets = self.targets(values, options);
        let sanitized: Values = values
            .iter()
            .filter_map(|(name, value)| {
                let key = normalize(name);
                targets.contains(&key).then(|| {
                    let cleaned = self.sanitize_field(&key, value);
                    (key, cleaned)
                })
            })
            .collect();
        self.registry
            .hooks()
            .apply_sanitized_values(sanitized, &self.context)
    }

    /// Sanitize, then validate the sanitized values without sanitizing again.
    pub fn process(&self, values: &Values, options: &BulkOptions) -> ProcessResult {
        let sanitized = self.sanitize_many(values, options);
        match self.validate_targets(&sanitized, options, false) {
            Ok(()) => ProcessResult {
                valid: true,
                values: sanitized,
                errors: None,
            },
            Err(errors) => ProcessResult {
                valid: false,
                values: sanitized,
                errors: Some(errors),
            },
        }
    }

    /// Presence-only check of every required field.
    pub fn validate_required(&self, values: &Values) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (name, def) in self.registry.list(&FieldQuery::new()) {
            if !def.required {
                continue;
            }
            if is_empty_value(input_value(values, &name).unwrap_or(&Value::Null)) {
                errors.add(name, required_message(&def));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn targets(&self, values: &Values, options: &BulkOptions) -> Vec<String> {
        let requested: Vec<String> = match &options.fields {
            Some(fields) => fields.iter().map(|name| normalize(name)).collect(),
            None => self
                .registry
                .names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };
        let mut targets: Vec<String> = Vec::with_capacity(requested.len());
        for name in requested {
            if !targets.contains(&name) {
                targets.push(name);
            }
        }
        if !options.skip_unregistered {
            for name in values.keys().map(|name| normalize(name)) {
                if !self.registry.contains(&name) && !targets.contains(&name) {
                    targets.push(name);
                }
            }
        }
        let exclude: Vec<String> = options.exclude.iter().map(|name| normalize(name)).collect();
        targets.retain(|name| !exclude.contains(name));
        targets
    }
}

/// Registry normalization, keeping names that normalize to nothing as given
/// so they can still be reported.
fn normalize(name: &str) -> String {
    let key = sanitize_key(name);
    if key.is_empty() {
        name.to_string()
    } else {
        key
    }
}

/// The supplied value for a normalized field name, matching input keys
/// written in any form that normalizes to it.
fn input_value<'v>(values: &'v Values, key: &str) -> Option<&'v Value> {
    values.get(key).or_else(|| {
        values
            .iter()
            .find(|(name, _)| normalize(name) == key)
            .map(|(_, value)| value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldworks_fields::FieldConfig;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn registry() -> FieldRegistry {
        let mut reg = FieldRegistry::with_builtin_types();
        reg.register("guests", FieldConfig::new("number").required())
            .unwrap();
        reg.register("nickname", FieldConfig::new("text").max_length(5))
            .unwrap();
        reg.register("mystery", FieldConfig::new("hologram")).unwrap();
        reg
    }

    fn values(pairs: &[(&str, Value)]) -> Values {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn configuration_errors_are_single_messages() {
        let reg = registry();
        let v = Validator::new(&reg);
        assert_eq!(
            v.validate_field("nope", &json!("x"), true),
            Err(vec!["unknown field: nope".to_string()])
        );
        assert_eq!(
            v.validate_field("mystery", &json!("x"), true),
            Err(vec!["unknown field type: hologram".to_string()])
        );
    }

    #[test]
    fn required_number_checked_before_sanitizing() {
        let reg = registry();
        let v = Validator::new(&reg);
        assert_eq!(
            v.validate_field("guests", &json!(""), true),
            Err(vec!["Guests is required.".to_string()])
        );
        assert_eq!(v.sanitize_field("guests", &json!("")), json!(""));
        assert_eq!(v.sanitize_field("guests", &json!("4")), json!(4));
    }

    #[test]
    fn sanitize_runs_before_kind_rules() {
        let reg = registry();
        let v = Validator::new(&reg);
        // Tags are stripped before the length check.
        assert!(v.validate_field("nickname", &json!("<b>bob</b>"), true).is_ok());
        assert!(v.validate_field("nickname", &json!("<b>bob</b>"), false).is_err());
    }

    #[test]
    fn unknown_names_pass_through_sanitizing() {
        let reg = registry();
        let v = Validator::new(&reg);
        assert_eq!(v.sanitize_field("stray", &json!("<i>x</i>")), json!("<i>x</i>"));
    }

    #[test]
    fn bulk_targets_respect_options() {
        let reg = registry();
        let v = Validator::new(&reg);
        let input = values(&[("nickname", json!("ok")), ("stray", json!(1))]);

        let errors = v.validate_many(&input, &BulkOptions::new()).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["guests", "mystery"]);

        let errors = v
            .validate_many(
                &input,
                &BulkOptions::new()
                    .exclude(["mystery"])
                    .skip_unregistered(false),
            )
            .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["guests", "stray"]);
        assert_eq!(errors.get("stray").unwrap(), ["unknown field: stray"]);

        assert!(v
            .validate_many(&input, &BulkOptions::new().only(["nickname"]))
            .is_ok());
    }

    #[test]
    fn sanitize_many_drops_or_keeps_unregistered() {
        let reg = registry();
        let v = Validator::new(&reg);
        let input = values(&[("nickname", json!("  al  ")), ("stray", json!("<x>"))]);

        let out = v.sanitize_many(&input, &BulkOptions::new());
        assert_eq!(out, values(&[("nickname", json!("al"))]));

        let out = v.sanitize_many(&input, &BulkOptions::new().skip_unregistered(false));
        assert_eq!(out["stray"], json!("<x>"));
    }

    #[test]
    fn validate_required_is_presence_only() {
        let reg = registry();
        let v = Validator::new(&reg);
        assert!(v
            .validate_required(&values(&[("guests", json!("not a number"))]))
            .is_ok());
        let errors = v.validate_required(&Values::new()).unwrap_err();
        assert_eq!(errors.get("guests").unwrap(), ["Guests is required."]);
    }

    #[test]
    fn context_reaches_hooks() {
        let mut reg = registry();
        reg.hooks_mut().add_post_validate(|outcome, _, def, ctx| {
            if ctx == "import" && def.name == "nickname" {
                return Err(vec!["Nicknames cannot be imported.".into()]);
            }
            outcome
        });
        let input = values(&[("nickname", json!("al"))]);
        let options = BulkOptions::new().only(["nickname"]);

        assert!(Validator::new(&reg).validate_many(&input, &options).is_ok());
        let errors = Validator::new(&reg)
            .with_context("import")
            .validate_many(&input, &options)
            .unwrap_err();
        assert_eq!(errors.get("nickname").unwrap(), ["Nicknames cannot be imported."]);
    }

    #[test]
    fn bulk_names_are_normalized_like_registration() {
        let mut reg = FieldRegistry::with_builtin_types();
        reg.register("Email", FieldConfig::new("email").required())
            .unwrap();
        let v = Validator::new(&reg);

        let result = v.process(
            &values(&[("email", json!("ada@example.com"))]),
            &BulkOptions::new().only(["Email"]),
        );
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(result.values, values(&[("email", json!("ada@example.com"))]));

        let result = v.process(&values(&[("EMAIL", json!(" Ada@Example.com "))]), &BulkOptions::new());
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(result.values["email"], json!("ada@example.com"));

        assert!(v
            .validate_many(&Values::new(), &BulkOptions::new().exclude(["EMAIL"]))
            .is_ok());
        assert!(v
            .validate_required(&values(&[("Email", json!("x"))]))
            .is_ok());
    }

    #[test]
    fn cross_field_rule_runs_after_every_field() {
        let mut reg = FieldRegistry::with_builtin_types();
        reg.register("password", FieldConfig::new("text")).unwrap();
        reg.register("confirm", FieldConfig::new("text")).unwrap();
        reg.hooks_mut().on_after_validate_all(|errors, values, _| {
            if values.get("password") != values.get("confirm") {
                errors.add("confirm", "Passwords do not match.");
            }
        });
        let v = Validator::new(&reg);

        let mismatch = values(&[("password", json!("abc")), ("confirm", json!("abd"))]);
        assert!(v.validate_field("confirm", &json!("abd"), true).is_ok());
        let result = v.process(&mismatch, &BulkOptions::new());
        assert!(!result.valid);
        assert_eq!(
            result.errors.unwrap().get("confirm").unwrap(),
            ["Passwords do not match."]
        );

        let matching = values(&[("password", json!("abc")), ("confirm", json!("abc"))]);
        assert!(v.validate_many(&matching, &BulkOptions::new()).is_ok());
    }

    #[test]
    fn pre_validate_filter_sees_sanitized_value() {
        let mut reg = registry();
        reg.hooks_mut().add_pre_validate(|value, def, _| {
            if def.name == "nickname" {
                json!(value.as_str().unwrap_or_default().to_uppercase())
            } else {
                value
            }
        });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        reg.hooks_mut().add_post_validate(move |outcome, value, def, _| {
            sink.lock().unwrap().push((def.name.clone(), value.clone()));
            outcome
        });

        let v = Validator::new(&reg);
        assert!(v.validate_field("nickname", &json!(" <b>al</b> "), true).is_ok());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("nickname".to_string(), json!("AL"))]
        );
    }

    #[test]
    fn sanitized_values_filter_and_before_notification_fire() {
        let mut reg = registry();
        reg.hooks_mut().add_sanitized_values(|mut values, ctx| {
            values.insert("guests".into(), json!(2));
            values.insert("context".into(), json!(ctx));
            values
        });
        let before = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&before);
        reg.hooks_mut().on_before_validate_all(move |values, ctx| {
            sink.lock()
                .unwrap()
                .push((ctx.to_string(), values.keys().cloned().collect::<Vec<_>>()));
        });

        let v = Validator::new(&reg).with_context("signup");
        let result = v.process(
            &values(&[("nickname", json!("al"))]),
            &BulkOptions::new().exclude(["mystery"]),
        );
        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(result.values["guests"], json!(2));
        assert_eq!(result.values["context"], json!("signup"));

        let calls = before.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "signup");
        assert_eq!(calls[0].1, vec!["nickname", "guests", "context"]);
    }
}
