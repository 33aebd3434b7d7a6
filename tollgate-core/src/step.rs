//! Synchronous validation steps and the chain that runs them.

use crate::context::{RequestContext, ResponseContext};
use crate::decode::{Outcome, decode_and_branch};
use crate::handler::SharedErrorHandler;
use crate::schema::SharedSchema;
use crate::source::Source;
use hyper::StatusCode;
use serde_json::Value;
use std::fmt;

/// Whether the chain continues after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Next,
    /// The step wrote the response; nothing after it may run.
    Halt,
}

pub trait Middleware: Send + Sync {
    fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> Flow;
}

impl<F> Middleware for F
where
    F: Fn(&mut RequestContext, &mut ResponseContext) -> Flow + Send + Sync,
{
    fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> Flow {
        self(req, res)
    }
}

/// Runs `steps` in order, stopping at the first one that halts.
pub fn run_chain(
    steps: &[&dyn Middleware],
    req: &mut RequestContext,
    res: &mut ResponseContext,
) -> Flow {
    for step in steps {
        if step.call(req, res) == Flow::Halt {
            return Flow::Halt;
        }
    }
    Flow::Next
}

/// Validates one request source.
///
/// Decoded body and params replace the request field. Decoded query data
/// goes to `res.locals` only. A mirrored step also copies decoded body or
/// params into `res.locals`.
#[derive(Clone)]
pub struct ValidationStep {
    source: Source,
    schema: Option<SharedSchema>,
    error_handler: Option<SharedErrorHandler>,
    mirror: bool,
}

impl ValidationStep {
    pub fn new(
        source: Source,
        schema: Option<SharedSchema>,
        error_handler: Option<SharedErrorHandler>,
    ) -> Self {
        Self {
            source,
            schema,
            error_handler,
            mirror: false,
        }
    }

    pub fn mirrored(mut self) -> Self {
        self.mirror = true;
        self
    }

    pub fn source(&self) -> Source {
        self.source
    }

    pub fn schema(&self) -> Option<&SharedSchema> {
        self.schema.as_ref()
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror
    }

    fn install(&self, value: Value, req: &mut RequestContext, res: &mut ResponseContext) {
        match self.source {
            Source::Query => res.locals.set(Source::Query, value),
            Source::Params | Source::Body => {
                if self.mirror {
                    res.locals.set(self.source, value.clone());
                }
                if self.source == Source::Params {
                    req.params = value;
                } else {
                    req.body = value;
                }
            }
        }
    }
}

impl Middleware for ValidationStep {
    fn call(&self, req: &mut RequestContext, res: &mut ResponseContext) -> Flow {
        if self.schema.is_none() {
            return Flow::Next;
        }
        let raw = req.get(self.source).clone();
        match decode_and_branch(
            self.schema.as_deref(),
            self.source,
            raw,
            self.error_handler.as_deref(),
        ) {
            Outcome::Proceed(value) => {
                self.install(value, req, res);
                Flow::Next
            }
            Outcome::Reject(payload) => {
                res.status(StatusCode::BAD_REQUEST).json(payload);
                Flow::Halt
            }
        }
    }
}

impl fmt::Debug for ValidationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationStep")
            .field("source", &self.source)
            .field("schema", &self.schema.as_ref().map(|s| s.name()))
            .field("error_handler", &self.error_handler.is_some())
            .field("mirror", &self.mirror)
            .finish()
    }
}

pub fn validate_body(
    schema: Option<SharedSchema>,
    error_handler: Option<SharedErrorHandler>,
) -> ValidationStep {
    ValidationStep::new(Source::Body, schema, error_handler)
}

pub fn validate_query(
    schema: Option<SharedSchema>,
    error_handler: Option<SharedErrorHandler>,
) -> ValidationStep {
    ValidationStep::new(Source::Query, schema, error_handler)
}

pub fn validate_params(
    schema: Option<SharedSchema>,
    error_handler: Option<SharedErrorHandler>,
) -> ValidationStep {
    ValidationStep::new(Source::Params, schema, error_handler)
}
