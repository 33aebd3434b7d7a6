use crate::format::format_issues;
use crate::issue::Issue;
use serde_json::{Value, json};
use std::sync::Arc;

/// Turns the issues of a rejected decode into the 400 response payload.
///
/// Any `Fn(&[Issue]) -> Value` closure is an error handler.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, issues: &[Issue]) -> Value;
}

impl<F> ErrorHandler for F
where
    F: Fn(&[Issue]) -> Value + Send + Sync,
{
    fn handle(&self, issues: &[Issue]) -> Value {
        self(issues)
    }
}

pub type SharedErrorHandler = Arc<dyn ErrorHandler>;

/// Wraps the formatted issues as `{ "errors": [...] }`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle(&self, issues: &[Issue]) -> Value {
        default_payload(issues)
    }
}

pub fn default_payload(issues: &[Issue]) -> Value {
    json!({ "errors": format_issues(issues) })
}

/// Payload for `issues`, using `handler` when one is configured.
pub fn rejection_payload(handler: Option<&dyn ErrorHandler>, issues: &[Issue]) -> Value {
    match handler {
        Some(handler) => handler.handle(issues),
        None => default_payload(issues),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Path;

    fn issues() -> Vec<Issue> {
        vec![Issue::invalid(
            &Path::root("{ age: number }").child("age", "number"),
            &json!("x"),
        )]
    }

    #[test]
    fn default_payload_wraps_errors() {
        let payload = default_payload(&issues());
        assert_eq!(payload["errors"][0]["key"], "age");
        assert_eq!(payload["errors"][0]["expected"], "number");
        assert_eq!(payload["errors"][0]["actual"], "x");
        assert_eq!(DefaultErrorHandler.handle(&issues()), payload);
    }

    #[test]
    fn closures_are_error_handlers() {
        let handler = |issues: &[Issue]| json!({ "count": issues.len() });
        assert_eq!(
            rejection_payload(Some(&handler), &issues()),
            json!({ "count": 1 })
        );
        assert!(rejection_payload(None, &issues())["errors"].is_array());
    }
}
