use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use tollgate_core::{DecodeResult, Issue, Path, PathStep, Schema};

/// Schema backed by a serde type carrying `garde` rules.
///
/// Decoding deserializes the raw value into `T`, runs `T::validate`, and
/// yields `T` serialized back to JSON. Deserialization failures and rule
/// violations are reported at the offending field.
///
/// # Example
/// ```
/// use garde::Validate;
/// use serde::{Deserialize, Serialize};
/// use tollgate::schema::Garde;
/// use tollgate::Schemas;
///
/// #[derive(Deserialize, Serialize, Validate)]
/// struct CreateUser {
///     #[garde(length(min = 3))]
///     username: String,
/// }
///
/// let schemas = Schemas::new().body(Garde::<CreateUser>::new());
/// ```
pub struct Garde<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Garde<T> {
    pub fn new() -> Self {
        Self {
            name: short_type_name(std::any::type_name::<T>()),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Garde<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Garde<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Garde<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Garde").field(&self.name).finish()
    }
}

impl<T> Schema for Garde<T>
where
    T: DeserializeOwned + Serialize + garde::Validate,
    T::Context: Default,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn validate(&self, raw: &Value, path: &Path) -> DecodeResult {
        let value: T = serde_path_to_error::deserialize(raw).map_err(|err| {
            let mut keys: Vec<String> = err.path().iter().filter_map(segment_key).collect();
            let message = err.inner().to_string();
            if let Some(field) = missing_field(&message) {
                keys.push(field.to_string());
            }
            let expected = expected_type(&message).map(str::to_string);
            vec![issue_at(raw, path, &keys, expected, message)]
        })?;

        if let Err(report) = value.validate() {
            return Err(report
                .iter()
                .map(|(field, error)| {
                    let keys = split_garde_path(&field.to_string());
                    issue_at(raw, path, &keys, None, error.to_string())
                })
                .collect());
        }

        serde_json::to_value(&value)
            .map_err(|e| vec![Issue::invalid(path, raw).with_message(e.to_string())])
    }
}

fn segment_key(segment: &serde_path_to_error::Segment) -> Option<String> {
    use serde_path_to_error::Segment;
    match segment {
        Segment::Seq { index } => Some(index.to_string()),
        Segment::Map { key } => Some(key.clone()),
        Segment::Enum { variant } => Some(variant.clone()),
        Segment::Unknown => None,
    }
}

/// `alloc::vec::Vec<app::Signup>` -> `Vec<Signup>`
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(last_segment(&segment));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(last_segment(&segment));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Type serde wanted, out of "invalid type: string \"x\", expected u8".
fn expected_type(message: &str) -> Option<&str> {
    message
        .rsplit_once(", expected ")
        .map(|(_, expected)| expected)
}

/// Field name out of serde's "missing field `name`" message.
fn missing_field(message: &str) -> Option<&str> {
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next()
}

/// `user.tags[1]` -> `["user", "tags", "1"]`
fn split_garde_path(path: &str) -> Vec<String> {
    path.split(['.', '['])
        .map(|part| part.trim_end_matches(']'))
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn lookup<'a>(raw: &'a Value, keys: &[String]) -> Option<&'a Value> {
    keys.iter().try_fold(raw, |value, key| match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Issue at `keys` below `path`; the engine text goes to `Issue::message`.
fn issue_at(
    raw: &Value,
    path: &Path,
    keys: &[String],
    expected: Option<String>,
    message: String,
) -> Issue {
    let mut at = path.clone();
    if let Some((last, parents)) = keys.split_last() {
        for (depth, key) in parents.iter().enumerate() {
            let container = match lookup(raw, &keys[..=depth]) {
                Some(Value::Array(_)) => "array",
                _ => "object",
            };
            at = at.child(key.as_str(), container);
        }
        let mut steps = at.into_steps();
        steps.push(PathStep::new(last.as_str(), expected));
        at = Path::from(steps);
    }
    Issue::new(&at, lookup(raw, keys).cloned()).with_message(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use tollgate_core::format_issues;

    #[derive(Debug, Deserialize, Serialize, garde::Validate)]
    struct Profile {
        #[garde(length(min = 2))]
        name: String,
    }

    #[derive(Debug, Deserialize, Serialize, garde::Validate)]
    struct User {
        #[garde(range(min = 18))]
        age: u32,
        #[garde(dive)]
        profile: Profile,
        #[garde(skip)]
        tags: Vec<String>,
    }

    fn schema() -> Garde<User> {
        Garde::new()
    }

    #[test]
    fn valid_input_round_trips() {
        let raw = json!({ "age": 30, "profile": { "name": "ann" }, "tags": ["a"] });
        assert_eq!(schema().decode(&raw).unwrap(), raw);
        assert_eq!(schema().name(), "User");
    }

    #[test]
    fn rule_violations_point_at_nested_fields() {
        let raw = json!({ "age": 10, "profile": { "name": "a" }, "tags": [] });
        let issues = schema().decode(&raw).unwrap_err();
        let mut keys: Vec<_> = format_issues(&issues).into_iter().map(|e| e.key).collect();
        keys.sort();
        assert_eq!(keys, vec!["age", "profile.name"]);
        let name = format_issues(&issues)
            .into_iter()
            .find(|e| e.key == "profile.name")
            .unwrap();
        assert_eq!(name.actual, "a");
    }

    #[test]
    fn type_errors_are_located_by_path() {
        let raw = json!({ "age": 30, "profile": { "name": "ann" }, "tags": ["a", 5] });
        let issues = schema().decode(&raw).unwrap_err();
        let formatted = format_issues(&issues);
        assert_eq!(formatted.len(), 1);
        assert_eq!(formatted[0].key, "tags.1");
        assert_eq!(formatted[0].actual, "5");
    }

    #[test]
    fn missing_fields_report_undefined() {
        let raw = json!({ "profile": { "name": "ann" }, "tags": [] });
        let formatted = format_issues(&schema().decode(&raw).unwrap_err());
        assert_eq!(formatted[0].key, "age");
        assert_eq!(formatted[0].actual, "undefined");
    }

    #[test]
    fn messages_name_the_expected_type_not_the_engine_text() {
        let raw = json!({ "age": "x", "profile": { "name": "ann" }, "tags": [] });
        let issues = schema().decode(&raw).unwrap_err();
        let formatted = format_issues(&issues);
        assert_eq!(formatted[0].expected, "u32");
        assert_eq!(
            formatted[0].message,
            "Invalid value for 'age': expected u32, got x"
        );
        assert_eq!(
            issues[0].message.as_deref(),
            Some("invalid type: string \"x\", expected u32")
        );

        let raw = json!({ "age": 30, "profile": { "name": "a" }, "tags": [] });
        let issues = schema().decode(&raw).unwrap_err();
        let formatted = format_issues(&issues);
        assert_eq!(formatted[0].expected, "unknown");
        assert_eq!(
            formatted[0].message,
            "Invalid value for 'profile.name': expected unknown, got a"
        );
        assert!(issues[0].message.is_some());
    }

    #[test]
    fn generic_type_names_stay_readable() {
        assert_eq!(Garde::<Vec<User>>::new().name(), "Vec<User>");
        assert_eq!(
            Garde::<std::collections::HashMap<String, Profile>>::new().name(),
            "HashMap<String, Profile>"
        );
    }

    #[test]
    fn splits_garde_paths() {
        assert_eq!(split_garde_path("user.tags[1]"), vec!["user", "tags", "1"]);
        assert_eq!(split_garde_path("[0].name"), vec!["0", "name"]);
    }
}
