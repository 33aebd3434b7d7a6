use crate::http::response::IntoResponse;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use tollgate_core::{RequestContext, ResponseContext, Resp};

/// Final stage of a route, reached only when every validation step passed.
///
/// Implemented for async functions taking the validated request and the
/// response context that carries [`tollgate_core::Locals`].
pub trait Handler: Clone + Send + Sync + 'static {
    fn call(&self, req: RequestContext, res: ResponseContext) -> BoxFuture<'static, Resp>;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(RequestContext, ResponseContext) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    fn call(&self, req: RequestContext, res: ResponseContext) -> BoxFuture<'static, Resp> {
        self(req, res).map(IntoResponse::into_response).boxed()
    }
}

/// Handler mounted without any validation step.
#[derive(Debug, Clone)]
pub struct Plain<H>(pub H);

pub fn plain<H: Handler>(handler: H) -> Plain<H> {
    Plain(handler)
}
