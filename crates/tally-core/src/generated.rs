//! Shape checks shared by every generated JSON list.

use serde_json::{Map, Value};

use tally_domain::Money;

use crate::{oracle::strip_code_fence, reconciliation_service::normalize_amount, CoreError};

/// Parses `raw` as a non-empty array of objects that each carry every key in
/// `required`. `noun` names the entries in messages; `invalid` builds the
/// caller's error.
pub(crate) fn generated_entries(
    raw: &str,
    required: &[&str],
    noun: &str,
    invalid: fn(String) -> CoreError,
) -> Result<Vec<Map<String, Value>>, CoreError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))?;
    let Value::Array(entries) = value else {
        return Err(invalid("expected a JSON array".into()));
    };
    if entries.is_empty() {
        return Err(invalid(format!("no {noun} generated")));
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let Value::Object(object) = entry else {
                return Err(invalid(format!("entry {index} is not an object")));
            };
            if let Some(missing) = required.iter().find(|key| !object.contains_key(**key)) {
                return Err(invalid(format!("entry {index} is missing `{missing}`")));
            }
            if text(&object["name"]).trim().is_empty() {
                return Err(invalid(format!("entry {index} has no name")));
            }
            Ok(object)
        })
        .collect()
}

pub(crate) fn text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Blank text is `None`.
pub(crate) fn optional_text(value: Option<&Value>) -> Option<String> {
    value
        .map(text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

pub(crate) fn balance(value: &Value) -> Money {
    match value {
        Value::Number(number) => number.as_f64().map(Money::from_f64).unwrap_or(Money::ZERO),
        Value::String(raw) => normalize_amount(raw),
        _ => Money::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid(message: String) -> CoreError {
        CoreError::InvalidChart(message)
    }

    #[test]
    fn entries_need_a_name() {
        let err = generated_entries(r#"[{"name": "  "}]"#, &["name"], "rows", invalid).unwrap_err();
        assert!(err.to_string().contains("entry 0 has no name"));
    }

    #[test]
    fn empty_array_names_the_entries() {
        let err = generated_entries("[]", &["name"], "rows", invalid).unwrap_err();
        assert!(err.to_string().contains("no rows generated"));
    }

    #[test]
    fn non_json_is_a_serde_error() {
        let err = generated_entries("not json", &["name"], "rows", invalid).unwrap_err();
        assert!(matches!(err, CoreError::Serde(_)));
    }

    #[test]
    fn optional_text_drops_blanks() {
        assert_eq!(optional_text(Some(&Value::String(" a@b.c ".into()))), Some("a@b.c".into()));
        assert_eq!(optional_text(Some(&Value::String("  ".into()))), None);
        assert_eq!(optional_text(Some(&Value::Null)), None);
        assert_eq!(optional_text(None), None);
    }
}
