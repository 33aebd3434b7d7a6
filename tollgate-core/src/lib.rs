//! Schema-driven validation of request body, query and route parameters.
//!
//! Every entry point funnels through [`decode_and_branch`]: a schema either
//! accepts the raw value (possibly coercing it) and the request continues, or
//! rejects it and the step answers `400` with a JSON payload.

pub mod body;
pub mod compose;
pub mod context;
pub mod decode;
pub mod format;
pub mod handler;
pub mod issue;
pub mod schema;
pub mod source;
pub mod step;
pub mod validator;

pub use body::{Body, BoxError, Req, Resp, TollgateError, empty_body, full_body};
pub use compose::{Schemas, Validated, validate};
pub use context::{Locals, RequestContext, ResponseContext};
pub use decode::{Outcome, decode_and_branch};
pub use format::{FormattedError, format_issues};
pub use handler::{DefaultErrorHandler, ErrorHandler, SharedErrorHandler};
pub use issue::{Issue, Path, PathStep};
pub use schema::{DecodeResult, Schema, SchemaExt, SharedSchema};
pub use source::Source;
pub use step::{
    Flow, Middleware, ValidationStep, run_chain, validate_body, validate_params, validate_query,
};
pub use validator::{Guarded, Validator};
