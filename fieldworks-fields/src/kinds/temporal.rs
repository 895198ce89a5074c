//! Calendar kinds. Values are stored in the wire formats HTML inputs submit.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::FieldOutcome;
use crate::field_type::{check_presence, Capabilities, FieldType};
use crate::markup::esc;
use crate::sanitize::sanitize_text;
use crate::types::FieldDef;
use crate::value::{is_empty_value, value_to_string, Value};

use super::{map_string, text_input};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

const DATE_DISPLAY: &str = "%B %-d, %Y";
const TIME_DISPLAY: &str = "%-I:%M %p";
const DATETIME_DISPLAY: &str = "%B %-d, %Y %-I:%M %p";

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

fn check_parses(value: &Value, def: &FieldDef, parses: bool, shape: &str) -> FieldOutcome {
    if let Some(outcome) = check_presence(value, def) {
        return outcome;
    }
    if parses {
        Ok(())
    } else {
        Err(vec![format!("{} must be a valid {}.", def.label, shape)])
    }
}

/// Formatted display, falling back to the escaped raw text when unparseable.
fn display_with<T>(value: &Value, parse: impl Fn(&str) -> Option<T>, show: impl Fn(T) -> String) -> String {
    if is_empty_value(value) {
        return String::new();
    }
    let raw = value_to_string(value);
    match parse(&raw) {
        Some(parsed) => esc(&show(parsed)),
        None => esc(&raw),
    }
}

/// Calendar date, `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateField;

impl FieldType for DateField {
    fn identifier(&self) -> &str {
        "date"
    }

    fn name(&self) -> &str {
        "Date"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().filterable().sortable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        text_input("date", def, value)
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        display_with(value, parse_date, |d| d.format(DATE_DISPLAY).to_string())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_text)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        let parses = parse_date(&value_to_string(value)).is_some();
        check_parses(value, def, parses, "date (YYYY-MM-DD)")
    }
}

/// Time of day, `HH:MM` in 24-hour form.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeField;

impl FieldType for TimeField {
    fn identifier(&self) -> &str {
        "time"
    }

    fn name(&self) -> &str {
        "Time"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().sortable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        text_input("time", def, value)
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        display_with(value, parse_time, |t| t.format(TIME_DISPLAY).to_string())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_text)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        let parses = parse_time(&value_to_string(value)).is_some();
        check_parses(value, def, parses, "time (HH:MM)")
    }
}

/// Local date and time, `YYYY-MM-DDTHH:MM`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeField;

impl FieldType for DateTimeField {
    fn identifier(&self) -> &str {
        "datetime"
    }

    fn name(&self) -> &str {
        "Date & Time"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::none().filterable().sortable()
    }

    fn render(&self, def: &FieldDef, value: &Value) -> String {
        text_input("datetime-local", def, value)
    }

    fn format_for_display(&self, value: &Value, _def: &FieldDef) -> String {
        display_with(value, parse_datetime, |dt| dt.format(DATETIME_DISPLAY).to_string())
    }

    fn sanitize(&self, value: &Value) -> Value {
        map_string(value, sanitize_text)
    }

    fn validate(&self, value: &Value, def: &FieldDef) -> FieldOutcome {
        let parses = parse_datetime(&value_to_string(value)).is_some();
        check_parses(value, def, parses, "date and time")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldConfig;
    use serde_json::json;

    fn def(kind: &str) -> FieldDef {
        FieldDef::from_config("starts", FieldConfig::new(kind))
    }

    #[test]
    fn date_validation_and_display() {
        let d = def("date");
        assert!(DateField.validate(&json!("2024-02-29"), &d).is_ok());
        assert_eq!(
            DateField.validate(&json!("2023-02-29"), &d).unwrap_err(),
            vec!["Starts must be a valid date (YYYY-MM-DD).".to_string()]
        );
        assert_eq!(DateField.format_for_display(&json!("2024-03-05"), &d), "March 5, 2024");
        assert_eq!(DateField.format_for_display(&json!("soon"), &d), "soon");
    }

    #[test]
    fn time_validation_and_display() {
        let d = def("time");
        assert!(TimeField.validate(&json!("09:30"), &d).is_ok());
        assert!(TimeField.validate(&json!("25:00"), &d).is_err());
        assert_eq!(TimeField.format_for_display(&json!("14:05"), &d), "2:05 PM");
    }

    #[test]
    fn datetime_validation_and_display() {
        let d = def("datetime");
        assert!(DateTimeField.validate(&json!("2024-03-05T18:45"), &d).is_ok());
        assert!(DateTimeField.validate(&json!("2024-03-05 18:45"), &d).is_err());
        assert_eq!(
            DateTimeField.format_for_display(&json!("2024-03-05T18:45"), &d),
            "March 5, 2024 6:45 PM"
        );
        assert!(DateTimeField
            .render(&d, &json!("2024-03-05T18:45"))
            .contains(r#"type="datetime-local""#));
    }
}
