//! Start-up sequence: kinds, then defaults from disk, then external fields.

use std::sync::Arc;

use fieldworks_fields::{
    Capabilities, FieldConfig, FieldDef, FieldDefaults, FieldQuery, FieldRegistry, FieldType,
    FieldsError, Value,
};
use serde_json::json;
use tempfile::TempDir;

/// A host-defined kind: a star rating stored as an integer 1-5.
struct RatingField;

impl FieldType for RatingField {
    fn identifier(&self) -> &str {
        "rating"
    }

    fn name(&self) -> &str {
        "Rating"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().sortable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        format!(
            r#"<input type="range" min="1" max="5" name="{}" value="{}">"#,
            def.input_name(),
            value.as_i64().unwrap_or(1)
        )
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        match value.as_i64() {
            Some(n) => "*".repeat(n.clamp(0, 5) as usize),
            None => String::new(),
        }
    }

    fn sanitize(&self, value: &Value) -> Value {
        value.clone()
    }
}

#[test_log::test(tokio::test)]
async fn host_setup_from_yaml_directory() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("stars.yaml"),
        "type: rating\nlabel: Stars\npriority: 1\n",
    )
    .unwrap();
    std::fs::write(
        tmp.path().join("venue.yaml"),
        "type: text\nrequired: true\nsearchable: true\n",
    )
    .unwrap();

    let mut registry = FieldRegistry::with_builtin_types();
    registry.register_type(Arc::new(RatingField)).unwrap();

    let defaults = FieldDefaults::load_dir(tmp.path()).await.unwrap();
    assert_eq!(registry.register_defaults_from(&defaults), 2);

    registry.hooks_mut().add_external_fields(|mut fields| {
        fields.insert("sponsor".into(), FieldConfig::new("text").priority(99));
        fields
    });
    assert_eq!(registry.load_external(), 1);

    let ordered: Vec<String> = registry.list(&FieldQuery::new()).into_keys().collect();
    assert_eq!(ordered, vec!["stars", "venue", "sponsor"]);

    let rating = registry.field_type_of("stars").unwrap();
    assert_eq!(rating.format_for_display(&json!(3), &registry.get("stars").unwrap()), "***");
    assert_eq!(registry.get("stars").unwrap().label, "Stars");
}

#[test]
fn custom_kind_cannot_shadow_a_stock_kind() {
    struct FakeText;
    impl FieldType for FakeText {
        fn identifier(&self) -> &str {
            "text"
        }
        fn name(&self) -> &str {
            "Fake"
        }
        fn render(&self, _def: &FieldDef, _value: &Value) -> String {
            String::new()
        }
        fn format_for_display(&self, _value: &Value, _def: &FieldDef) -> String {
            String::new()
        }
        fn sanitize(&self, value: &Value) -> Value {
            value.clone()
        }
    }

    let mut registry = FieldRegistry::with_builtin_types();
    let err = registry.register_type(Arc::new(FakeText)).unwrap_err();
    assert!(matches!(err, FieldsError::DuplicateFieldType { .. }));
    assert_eq!(registry.types().get("text").unwrap().name(), "Text");
}
