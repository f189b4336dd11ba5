//! Value resolution: apply a [`Fetcher`] to a record.

use serde_json::Value;

use crate::error::PathError;
use crate::path::PropertyPath;
use crate::types::Fetcher;

/// Resolve `fetcher` against `record`.
///
/// Callbacks are invoked directly and their result is returned as-is, even
/// when it is empty. Property paths that do not match the record's shape
/// yield `Ok(None)`; a path with invalid syntax is an error.
pub fn resolve(fetcher: &Fetcher, record: &Value) -> Result<Option<Value>, PathError> {
    match fetcher {
        Fetcher::Callback(f) => Ok(Some(f(record))),
        Fetcher::Path(raw) => {
            let path = PropertyPath::parse(raw)?;
            let found = path.evaluate(record).cloned();
            if found.is_none() {
                tracing::trace!(path = %path, "property path did not resolve");
            }
            Ok(found)
        }
    }
}

/// Resolve `fetcher` and coerce the result with [`to_text`].
pub fn resolve_text(fetcher: &Fetcher, record: &Value) -> Result<String, PathError> {
    Ok(to_text(resolve(fetcher, record)?.as_ref()))
}

/// Coerce a resolved value to a trimmed string.
///
/// Absent and `null` become `""`. Arrays and objects are written as compact
/// JSON.
pub fn to_text(value: Option<&Value>) -> String {
    let text = match value {
        None | Some(Value::Null) => return String::new(),
        Some(Value::String(s)) => return s.trim().to_owned(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    };
    text.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn path_fetcher_reads_nested_member() {
        let record = json!({ "user": { "name": "Ann" } });
        let value = resolve(&Fetcher::path("user.name"), &record).unwrap();
        assert_eq!(value, Some(json!("Ann")));
    }

    #[test]
    fn path_fetcher_tolerates_missing_member() {
        let record = json!({ "object": { "property": "value 1" } });
        let value = resolve(&Fetcher::path("[object].not.existent.property"), &record).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn path_fetcher_tolerates_null_intermediate() {
        let record = json!({ "user": null });
        assert_eq!(resolve(&Fetcher::path("user.name"), &record).unwrap(), None);
    }

    #[test]
    fn malformed_path_is_an_error() {
        let err = resolve(&Fetcher::path("user..name"), &json!({})).unwrap_err();
        assert!(err.to_string().contains("user..name"));
    }

    #[test]
    fn callback_result_is_returned_even_when_empty() {
        let fetcher = Fetcher::callback(|_| json!(""));
        assert_eq!(resolve(&fetcher, &json!({})).unwrap(), Some(json!("")));
    }

    #[test]
    fn callback_receives_the_record() {
        let fetcher = Fetcher::callback(|r| r["object"]["property"].clone());
        let record = json!({ "object": { "property": "value 1" } });
        assert_eq!(resolve_text(&fetcher, &record).unwrap(), "value 1");
    }

    #[rstest]
    #[case(None, "")]
    #[case(Some(json!(null)), "")]
    #[case(Some(json!("  padded  ")), "padded")]
    #[case(Some(json!("0")), "0")]
    #[case(Some(json!(42)), "42")]
    #[case(Some(json!(1.5)), "1.5")]
    #[case(Some(json!(true)), "true")]
    #[case(Some(json!(false)), "false")]
    #[case(Some(json!([1, "a"])), r#"[1,"a"]"#)]
    #[case(Some(json!({ "k": 1 })), r#"{"k":1}"#)]
    fn coerces_values_to_text(#[case] value: Option<Value>, #[case] expected: &str) {
        assert_eq!(to_text(value.as_ref()), expected);
    }
}
