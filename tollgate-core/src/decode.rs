use crate::handler::{ErrorHandler, rejection_payload};
use crate::schema::Schema;
use crate::source::Source;
use serde_json::Value;

/// Result of checking one request source.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Value to install at the source location before continuing.
    Proceed(Value),
    /// Payload of the 400 response; the chain must stop.
    Reject(Value),
}

impl Outcome {
    pub fn is_proceed(&self) -> bool {
        matches!(self, Outcome::Proceed(_))
    }
}

/// Decodes `raw` with `schema` and decides how the request continues.
///
/// Without a schema the raw value proceeds untouched. On rejection the
/// payload comes from `error_handler`, or is `{ "errors": [...] }` when none
/// is configured.
pub fn decode_and_branch(
    schema: Option<&dyn Schema>,
    source: Source,
    raw: Value,
    error_handler: Option<&dyn ErrorHandler>,
) -> Outcome {
    let Some(schema) = schema else {
        return Outcome::Proceed(raw);
    };
    match schema.decode(&raw) {
        Ok(decoded) => Outcome::Proceed(decoded),
        Err(issues) => {
            tracing::debug!(
                source = %source,
                schema = %schema.name(),
                issues = issues.len(),
                "request data rejected"
            );
            Outcome::Reject(rejection_payload(error_handler, &issues))
        }
    }
}
