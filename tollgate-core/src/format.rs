//! Normalizes schema issues into the user-facing error shape.

use crate::issue::Issue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const UNKNOWN: &str = "unknown";

/// User-facing description of one validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedError {
    /// Dotted path of the offending field, e.g. `user.profile.name`.
    pub key: String,
    /// Type name the schema expected at that field.
    pub expected: String,
    /// Rendering of the value that was received.
    pub actual: String,
    pub message: String,
}

impl FormattedError {
    pub fn from_issue(issue: &Issue) -> Self {
        let path = issue.field_path();
        let key = if !path.is_empty() {
            path
        } else {
            issue
                .last_step()
                .filter(|step| step.is_named())
                .map(|step| step.key.clone())
                .unwrap_or_else(|| UNKNOWN.to_string())
        };
        let expected = issue
            .last_step()
            .and_then(|step| step.expected.clone())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let actual = render_actual(issue.actual.as_ref());
        let message = format!("Invalid value for '{key}': expected {expected}, got {actual}");
        Self {
            key,
            expected,
            actual,
            message,
        }
    }
}

/// Maps every issue to a [`FormattedError`], keeping order and count.
pub fn format_issues(issues: &[Issue]) -> Vec<FormattedError> {
    issues.iter().map(FormattedError::from_issue).collect()
}

/// Structured values are rendered as compact JSON, scalars by their plain
/// string form, and an absent value as `undefined`.
pub fn render_actual(actual: Option<&Value>) -> String {
    match actual {
        None => "undefined".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => match n.as_f64() {
            // integral floats print without a fractional part, `1.0` as `1`
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Some(structured @ (Value::Array(_) | Value::Object(_))) => {
            serde_json::to_string(structured).unwrap_or_else(|_| structured.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{Path, PathStep};
    use serde_json::json;

    #[test]
    fn nested_field_uses_dotted_key() {
        let path = Path::root("{ user: ... }")
            .child("user", "{ profile: ... }")
            .child("profile", "{ name: string }")
            .child("name", "string");
        let err = FormattedError::from_issue(&Issue::invalid(&path, &json!(123)));
        assert_eq!(err.key, "user.profile.name");
        assert_eq!(err.expected, "string");
        assert_eq!(err.actual, "123");
        assert_eq!(
            err.message,
            "Invalid value for 'user.profile.name': expected string, got 123"
        );
    }

    #[test]
    fn root_failure_falls_back_to_unknown() {
        let err = FormattedError::from_issue(&Issue::invalid(
            &Path::root("{ name: string }"),
            &json!("not an object"),
        ));
        assert_eq!(err.key, "unknown");
        assert_eq!(err.expected, "{ name: string }");
        assert_eq!(err.actual, "not an object");
    }

    #[test]
    fn single_named_root_step_is_used_as_key() {
        let issue = Issue {
            path: vec![PathStep::new("id", Some("NumberFromString".into()))],
            actual: Some(json!("abc")),
            message: None,
        };
        let err = FormattedError::from_issue(&issue);
        assert_eq!(err.key, "id");
        assert_eq!(err.expected, "NumberFromString");
    }

    #[test]
    fn empty_path_is_unknown_everywhere() {
        let issue = Issue {
            path: Vec::new(),
            actual: None,
            message: None,
        };
        let err = FormattedError::from_issue(&issue);
        assert_eq!(err.key, "unknown");
        assert_eq!(err.expected, "unknown");
        assert_eq!(err.actual, "undefined");
    }

    #[test]
    fn actual_rendering() {
        assert_eq!(render_actual(Some(&json!({"a": [1, 2]}))), r#"{"a":[1,2]}"#);
        assert_eq!(render_actual(Some(&json!([true]))), "[true]");
        assert_eq!(render_actual(Some(&json!(null))), "null");
        assert_eq!(render_actual(Some(&json!(false))), "false");
        assert_eq!(render_actual(Some(&json!(1.5))), "1.5");
        assert_eq!(render_actual(Some(&json!(1.0))), "1");
        assert_eq!(render_actual(Some(&json!(-20.0))), "-20");
        assert_eq!(render_actual(Some(&json!(7))), "7");
        assert_eq!(render_actual(Some(&json!("x"))), "x");
        assert_eq!(render_actual(None), "undefined");
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let path = Path::root("object").child("tags", "Array<string>");
        let issues = vec![
            Issue::invalid(&path, &json!(1)),
            Issue::invalid(&path, &json!(1)),
            Issue::missing(&Path::root("object").child("name", "string")),
        ];
        let formatted = format_issues(&issues);
        assert_eq!(formatted.len(), 3);
        assert_eq!(formatted[0], formatted[1]);
        assert_eq!(formatted[2].key, "name");
        assert_eq!(formatted[2].actual, "undefined");
    }
}
