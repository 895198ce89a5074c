use crate::error::FieldOutcome;
use crate::field_type::{check_presence, Capabilities, FieldType};
use crate::markup::{esc, fmt_number, Tag};
use crate::types::FieldDef;
use crate::value::{is_empty_value, value_to_string, Value};

use super::{base_input, numeric_attrs};

/// Numeric reading of a value, accepting numeric strings.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn integral_step(def: &FieldDef) -> bool {
    def.step.is_some_and(|step| step.fract() == 0.0)
}

fn to_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Integer or decimal number.
///
/// Sanitizing turns an empty submission into `0` and parses numeric strings.
/// Text that does not parse is kept so validation can report it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberField;

impl NumberField {
    fn clean(value: &Value, round: bool) -> Value {
        if is_empty_value(value) {
            return Value::from(0);
        }
        match as_number(value) {
            Some(n) if round => to_value(n.round()),
            Some(n) => to_value(n),
            None => match value {
                Value::String(s) => Value::String(s.trim().to_string()),
                other => other.clone(),
            },
        }
    }
}

impl FieldType for NumberField {
    fn identifier(&self) -> &str {
        "number"
    }

    fn name(&self) -> &str {
        "Number"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().filterable().sortable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        let tag: Tag = base_input("number", def, &value_to_string(value));
        numeric_attrs(tag, def).void()
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        if is_empty_value(value) {
            return String::new();
        }
        match as_number(value) {
            Some(n) => fmt_number(n),
            None => esc(&value_to_string(value)),
        }
    }

    fn sanitize(&self, value: &Value) -> Value {
        Self::clean(value, false)
    }

    fn sanitize_with_field(&self, value: &Value, def: &FieldDef) -> Value {
        Self::clean(value, integral_step(def))
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        if let Some(outcome) = check_presence(value, def) {
            return outcome;
        }
        let Some(n) = as_number(value) else {
            return Err(vec![format!("{} must be a number.", def.label)]);
        };

        let mut errors = Vec::new();
        if let Some(min) = def.min.filter(|min| n < *min) {
            errors.push(format!("{} must be at least {}.", def.label, fmt_number(min)));
        }
        if let Some(max) = def.max.filter(|max| n > *max) {
            errors.push(format!("{} must be at most {}.", def.label, fmt_number(max)));
        }
        if integral_step(def) && n.fract() != 0.0 {
            errors.push(format!("{} must be a whole number.", def.label));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldConfig;
    use serde_json::json;

    fn def() -> FieldDef {
        FieldDef::from_config(
            "guests",
            FieldConfig::new("number").range(Some(1.0), Some(10.0)).step(1.0),
        )
    }

    #[test]
    fn sanitize_parses_and_defaults_to_zero() {
        assert_eq!(NumberField.sanitize(&json!("")), json!(0));
        assert_eq!(NumberField.sanitize(&Value::Null), json!(0));
        assert_eq!(NumberField.sanitize(&json!(" 12.5 ")), json!(12.5));
        assert_eq!(NumberField.sanitize(&json!("7")), json!(7));
        assert_eq!(NumberField.sanitize(&json!("abc")), json!("abc"));
    }

    #[test]
    fn integral_step_rounds() {
        assert_eq!(NumberField.sanitize_with_field(&json!("3.6"), &def()), json!(4));
    }

    #[test]
    fn range_and_type_checks() {
        let d = def();
        assert!(NumberField.validate(&json!(5), &d).is_ok());
        assert!(NumberField.validate(&json!("5"), &d).is_ok());
        assert_eq!(
            NumberField.validate(&json!(0), &d).unwrap_err(),
            vec!["Guests must be at least 1.".to_string()]
        );
        assert_eq!(
            NumberField.validate(&json!(11.5), &d).unwrap_err(),
            vec![
                "Guests must be at most 10.".to_string(),
                "Guests must be a whole number.".to_string()
            ]
        );
        assert_eq!(
            NumberField.validate(&json!("lots"), &d).unwrap_err(),
            vec!["Guests must be a number.".to_string()]
        );
    }

    #[test]
    fn zero_is_a_value() {
        let d = FieldDef::from_config("count", FieldConfig::new("number").required());
        assert!(NumberField.validate(&json!(0), &d).is_ok());
        assert_eq!(NumberField.format_for_display(&json!(0), &d), "0");
    }

    #[test]
    fn renders_bounds() {
        let html = NumberField.render(&def(), &json!(3));
        assert!(html.contains(r#"type="number""#));
        assert!(html.contains(r#"min="1""#));
        assert!(html.contains(r#"max="10""#));
        assert!(html.contains(r#"step="1""#));
        assert!(html.contains(r#"value="3""#));
    }
}
