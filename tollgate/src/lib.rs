//! HTTP host for `tollgate-core` validation pipelines.
//!
//! Routes mount [`Validated`] / [`Guarded`] pipelines built from schemas; each
//! request is loaded into a [`RequestContext`], run through its validation
//! steps, and only reaches the handler when every step accepted its input.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod middleware;
pub mod router;
pub mod schema;
#[cfg(feature = "test")]
pub mod test;

pub use http_body_util;
pub use hyper;
pub use serde_json;
pub use tokio;
pub use tollgate_core;
pub use tower;
pub use tracing;

#[cfg(feature = "validation")]
pub use garde::{self, Validate};

pub use config::Settings;
pub use endpoint::{Handler, IntoEndpoint, plain};
pub use error::{AppError, AppResult, ErrorResponse};
pub use http::response::{IntoResponse, Json};
pub use router::{HttpSvc, Router};
pub use tollgate_core::{
    DefaultErrorHandler, ErrorHandler, FormattedError, Guarded, Issue, Locals, Req,
    RequestContext, Resp, ResponseContext, Schema, SchemaExt, Schemas, Source, Validated,
    Validator, format_issues, validate, validate_body, validate_params, validate_query,
};
