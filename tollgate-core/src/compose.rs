//! Query, params and body validation fused in front of a handler.

use crate::context::{RequestContext, ResponseContext};
use crate::handler::SharedErrorHandler;
use crate::schema::{Schema, SharedSchema};
use crate::source::Source;
use crate::step::{Flow, Middleware, ValidationStep, run_chain};
use std::fmt;
use std::sync::Arc;

/// Optional schema per request source.
#[derive(Clone, Default)]
pub struct Schemas {
    pub query: Option<SharedSchema>,
    pub params: Option<SharedSchema>,
    pub body: Option<SharedSchema>,
}

impl Schemas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, schema: impl Schema + 'static) -> Self {
        self.query = Some(Arc::new(schema));
        self
    }

    pub fn params(mut self, schema: impl Schema + 'static) -> Self {
        self.params = Some(Arc::new(schema));
        self
    }

    pub fn body(mut self, schema: impl Schema + 'static) -> Self {
        self.body = Some(Arc::new(schema));
        self
    }

    pub fn get(&self, source: Source) -> Option<&SharedSchema> {
        match source {
            Source::Query => self.query.as_ref(),
            Source::Params => self.params.as_ref(),
            Source::Body => self.body.as_ref(),
        }
    }
}

impl fmt::Debug for Schemas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |s: &Option<SharedSchema>| s.as_ref().map(|s| s.name());
        f.debug_struct("Schemas")
            .field("query", &name(&self.query))
            .field("params", &name(&self.params))
            .field("body", &name(&self.body))
            .finish()
    }
}

/// Four-stage pipeline: query step, params step, body step, handler.
///
/// The handler may only run once all three steps returned [`Flow::Next`].
#[derive(Debug, Clone)]
pub struct Validated<H> {
    query: ValidationStep,
    params: ValidationStep,
    body: ValidationStep,
    handler: H,
}

impl<H> Validated<H> {
    pub fn steps(&self) -> [&ValidationStep; 3] {
        [&self.query, &self.params, &self.body]
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_parts(self) -> (ValidationStep, ValidationStep, ValidationStep, H) {
        (self.query, self.params, self.body, self.handler)
    }

    /// Runs the three validation steps in order.
    pub fn run_steps(&self, req: &mut RequestContext, res: &mut ResponseContext) -> Flow {
        let [query, params, body] = self.steps();
        run_chain(&[query as &dyn Middleware, params, body], req, res)
    }
}

/// Builds the pipeline with the default error payload.
pub fn validate<H>(schemas: Schemas, handler: H) -> Validated<H> {
    validate_with(schemas, None, handler)
}

pub(crate) fn validate_with<H>(
    schemas: Schemas,
    error_handler: Option<SharedErrorHandler>,
    handler: H,
) -> Validated<H> {
    let step = |source: Source, schema: Option<SharedSchema>| {
        let step = ValidationStep::new(source, schema, error_handler.clone());
        match source {
            Source::Query => step,
            Source::Params | Source::Body => step.mirrored(),
        }
    };
    Validated {
        query: step(Source::Query, schemas.query),
        params: step(Source::Params, schemas.params),
        body: step(Source::Body, schemas.body),
        handler,
    }
}
