//! Adapts validation pipelines and plain handlers into routable services.

mod handler;
mod pipeline;

pub use handler::{Handler, Plain, plain};
pub use pipeline::PipelineSvc;

use crate::router::HttpSvc;
use tollgate_core::{Guarded, Validated, ValidationStep};
use tower::util::BoxCloneService;

/// Anything that can be mounted on a route.
pub trait IntoEndpoint {
    fn into_endpoint(self) -> HttpSvc;
}

impl<H: Handler> IntoEndpoint for Validated<H> {
    fn into_endpoint(self) -> HttpSvc {
        let (query, params, body, handler) = self.into_parts();
        PipelineSvc::new(vec![query, params, body], handler).boxed()
    }
}

impl<H: Handler> IntoEndpoint for Guarded<H> {
    fn into_endpoint(self) -> HttpSvc {
        let (step, handler) = self.into_parts();
        PipelineSvc::new(vec![step], handler).boxed()
    }
}

impl<H: Handler> IntoEndpoint for Plain<H> {
    fn into_endpoint(self) -> HttpSvc {
        PipelineSvc::new(Vec::<ValidationStep>::new(), self.0).boxed()
    }
}

impl IntoEndpoint for HttpSvc {
    fn into_endpoint(self) -> HttpSvc {
        self
    }
}

impl<H: Handler> PipelineSvc<H> {
    fn boxed(self) -> HttpSvc {
        BoxCloneService::new(self)
    }
}
