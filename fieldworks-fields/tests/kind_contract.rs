//! Behaviour every stock kind shares.

use fieldworks_fields::kinds::{decode_list, encode_list};
use fieldworks_fields::{FieldConfig, FieldDef, TypeRegistry, Value};
use proptest::prelude::*;
use rstest::rstest;
use serde_json::json;

fn def(kind: &str, required: bool) -> FieldDef {
    let mut config = FieldConfig::new(kind).option("a", "Alpha").option("b", "Beta");
    if required {
        config = config.required();
    }
    FieldDef::from_config("sample_field", config)
}

fn empties() -> Vec<Value> {
    vec![Value::Null, json!(""), json!("   "), json!([])]
}

#[rstest]
fn empty_optional_is_valid(
    #[values(
        "text", "textarea", "richtext", "email", "url", "phone", "number", "date", "time",
        "datetime", "color", "select", "radio", "checkbox", "multiselect", "checkboxgroup",
        "file", "image", "gallery", "hidden", "password"
    )]
    kind: &str,
) {
    let types = TypeRegistry::with_builtin_types();
    let field_type = types.get(kind).unwrap();
    let def = def(kind, false);
    for empty in empties() {
        assert_eq!(field_type.validate(&empty, &def), Ok(()), "{kind} with {empty}");
    }
}

#[rstest]
fn empty_required_names_the_label(
    #[values(
        "text", "textarea", "richtext", "email", "url", "phone", "number", "date", "time",
        "datetime", "color", "select", "radio", "checkbox", "multiselect", "checkboxgroup",
        "file", "image", "gallery", "hidden", "password"
    )]
    kind: &str,
) {
    let types = TypeRegistry::with_builtin_types();
    let field_type = types.get(kind).unwrap();
    let def = def(kind, true);
    for empty in empties() {
        let errors = field_type.validate(&empty, &def).unwrap_err();
        assert_eq!(errors, vec!["Sample Field is required.".to_string()], "{kind}");
    }
}

#[rstest]
fn empty_display_renders_nothing(
    #[values(
        "text", "textarea", "richtext", "email", "url", "phone", "number", "date", "time",
        "datetime", "color", "select", "radio", "checkbox", "multiselect", "checkboxgroup",
        "file", "image", "gallery", "hidden", "password"
    )]
    kind: &str,
) {
    let types = TypeRegistry::with_builtin_types();
    let field_type = types.get(kind).unwrap();
    let def = def(kind, false);
    for empty in empties() {
        assert_eq!(field_type.format_for_display(&empty, &def), "", "{kind}");
    }
    assert_eq!(
        field_type.format_for_display(&field_type.default_value(), &def),
        "",
        "{kind} default value"
    );
}

#[rstest]
fn render_uses_form_naming(
    #[values(
        "text", "textarea", "richtext", "email", "url", "phone", "number", "date", "time",
        "datetime", "color", "select", "radio", "checkbox", "multiselect", "checkboxgroup",
        "file", "image", "gallery", "hidden"
    )]
    kind: &str,
) {
    let types = TypeRegistry::with_builtin_types();
    let field_type = types.get(kind).unwrap();
    let html = field_type.render(&def(kind, false), &field_type.default_value());
    assert!(html.contains("fields[sample_field]"), "{kind}: {html}");
}

#[test]
fn structured_kinds_decode_defensively() {
    let types = TypeRegistry::with_builtin_types();
    for kind in ["multiselect", "checkboxgroup", "gallery"] {
        let field_type = types.get(kind).unwrap();
        assert!(field_type.capabilities().repeater, "{kind}");
        for raw in [json!("{broken"), json!("\"str\""), json!(12), Value::Null] {
            assert_eq!(field_type.decode_from_storage(&raw), json!([]), "{kind} {raw}");
        }
    }
}

proptest! {
    #[test]
    fn list_codec_round_trips(items in prop::collection::vec(".*", 0..8)) {
        let value = Value::Array(items.into_iter().map(Value::String).collect());
        let stored = encode_list(&value);
        prop_assert!(stored.is_string());
        prop_assert_eq!(decode_list(&stored), value);
    }

    #[test]
    fn decode_never_panics(raw in ".*") {
        let decoded = decode_list(&Value::String(raw));
        prop_assert!(decoded.is_array());
    }
}
