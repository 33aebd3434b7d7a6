use crate::compose::{Schemas, Validated, validate_with};
use crate::handler::{ErrorHandler, SharedErrorHandler, rejection_payload};
use crate::issue::Issue;
use crate::schema::SharedSchema;
use crate::source::Source;
use crate::step::ValidationStep;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Validation entry points with one error handler bound up front.
///
/// Build it once at route registration and reuse it for every route:
///
/// ```
/// use tollgate_core::{Issue, Schemas, Validator};
/// use tollgate_core::schema::{object, string};
/// use serde_json::json;
///
/// let validator = Validator::with_error_handler(|issues: &[Issue]| {
///     json!({ "code": "INVALID", "count": issues.len() })
/// });
/// let pipeline = validator.validate(Schemas::new().body(object([("name", string())])), ());
/// let (_query, _params, _body, ()) = pipeline.into_parts();
/// ```
#[derive(Clone, Default)]
pub struct Validator {
    error_handler: Option<SharedErrorHandler>,
}

impl Validator {
    /// Validator producing the default `{ "errors": [...] }` payload.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_handler(handler: impl ErrorHandler + 'static) -> Self {
        Self {
            error_handler: Some(Arc::new(handler)),
        }
    }

    pub fn error_handler(&self) -> Option<&SharedErrorHandler> {
        self.error_handler.as_ref()
    }

    /// Payload this validator responds with for `issues`.
    pub fn payload(&self, issues: &[Issue]) -> Value {
        rejection_payload(self.error_handler.as_deref(), issues)
    }

    /// Bare middleware for `source`, without a handler attached.
    pub fn step(&self, source: Source, schema: Option<SharedSchema>) -> ValidationStep {
        ValidationStep::new(source, schema, self.error_handler.clone())
    }

    pub fn validate_body<H>(&self, schema: Option<SharedSchema>, handler: H) -> Guarded<H> {
        Guarded::new(self.step(Source::Body, schema), handler)
    }

    pub fn validate_query<H>(&self, schema: Option<SharedSchema>, handler: H) -> Guarded<H> {
        Guarded::new(self.step(Source::Query, schema), handler)
    }

    pub fn validate_params<H>(&self, schema: Option<SharedSchema>, handler: H) -> Guarded<H> {
        Guarded::new(self.step(Source::Params, schema), handler)
    }

    pub fn validate<H>(&self, schemas: Schemas, handler: H) -> Validated<H> {
        validate_with(schemas, self.error_handler.clone(), handler)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("custom_error_handler", &self.error_handler.is_some())
            .finish()
    }
}

/// A single validation step paired with the handler it protects.
#[derive(Debug, Clone)]
pub struct Guarded<H> {
    step: ValidationStep,
    handler: H,
}

impl<H> Guarded<H> {
    pub fn new(step: ValidationStep, handler: H) -> Self {
        Self { step, handler }
    }

    pub fn step(&self) -> &ValidationStep {
        &self.step
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_parts(self) -> (ValidationStep, H) {
        (self.step, self.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{RequestContext, ResponseContext};
    use crate::schema::{SchemaExt, number, object, string};
    use crate::step::{Flow, Middleware};
    use hyper::StatusCode;
    use serde_json::json;

    fn bad_body() -> RequestContext {
        RequestContext::from_values(json!({}), json!({}), json!({ "name": 5 }))
    }

    #[test]
    fn default_validator_wraps_errors_for_every_entry_point() {
        let validator = Validator::new();
        let schema = object([("name", string())]).shared();

        let (step, _) = validator.validate_body(Some(schema.clone()), ()).into_parts();
        let mut res = ResponseContext::new();
        assert_eq!(step.call(&mut bad_body(), &mut res), Flow::Halt);
        assert!(res.payload().unwrap()["errors"].is_array());

        let pipeline = validator.validate(Schemas::new().body(object([("name", string())])), ());
        let mut res = ResponseContext::new();
        assert_eq!(pipeline.run_steps(&mut bad_body(), &mut res), Flow::Halt);
        assert_eq!(res.payload().unwrap()["errors"][0]["key"], "name");
    }

    #[test]
    fn bound_handler_applies_to_all_operations() {
        let validator =
            Validator::with_error_handler(|issues: &[Issue]| json!({ "bad": issues.len() }));
        let schema = object([("q", number())]).shared();

        let (step, handler) = validator.validate_query(Some(schema), "h").into_parts();
        assert_eq!(step.source(), Source::Query);
        assert_eq!(handler, "h");
        let mut req = RequestContext::from_values(json!({ "q": "x" }), json!({}), json!(null));
        let mut res = ResponseContext::new();
        assert_eq!(step.call(&mut req, &mut res), Flow::Halt);
        assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(res.payload(), Some(&json!({ "bad": 1 })));

        let pipeline = validator.validate(Schemas::new().params(object([("id", number())])), ());
        let mut req = RequestContext::from_values(json!({}), json!({ "id": "1" }), json!(null));
        let mut res = ResponseContext::new();
        assert_eq!(pipeline.run_steps(&mut req, &mut res), Flow::Halt);
        assert_eq!(res.payload(), Some(&json!({ "bad": 1 })));
    }

    #[test]
    fn single_source_ops_do_not_mirror() {
        let validator = Validator::new();
        let guarded = validator.validate_params(Some(object([("id", string())]).shared()), ());
        assert!(!guarded.step().is_mirrored());
        let mut req = RequestContext::from_values(json!({}), json!({ "id": "a" }), json!(null));
        let mut res = ResponseContext::new();
        assert_eq!(guarded.step().call(&mut req, &mut res), Flow::Next);
        assert_eq!(res.locals.typed_params, None);
    }

    #[test]
    fn payload_follows_configuration() {
        assert_eq!(Validator::new().payload(&[]), json!({ "errors": [] }));
        let custom = Validator::with_error_handler(|_: &[Issue]| json!("nope"));
        assert_eq!(custom.payload(&[]), json!("nope"));
        assert_eq!(format!("{custom:?}"), "Validator { custom_error_handler: true }");
    }

    #[test]
    fn missing_schema_skips_for_bound_body() {
        let (step, ()) = Validator::new().validate_body(None, ()).into_parts();
        let mut req = bad_body();
        let mut res = ResponseContext::new();
        assert_eq!(step.call(&mut req, &mut res), Flow::Next);
        assert_eq!(req.body, json!({ "name": 5 }));
        assert!(!res.is_sent());
    }
}
