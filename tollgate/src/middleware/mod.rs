use crate::error::{AppError, AppResult};
use std::future::Future;
use std::task::{Context, Poll};
use tollgate_core::{Req, Resp};
use tower::util::BoxCloneService;
use tower::{Layer, Service};

/// The rest of the stack behind an async middleware.
pub struct Next {
    inner: BoxCloneService<Req, Resp, AppError>,
}

impl Next {
    /// Execute the next middleware, the router, or a validated endpoint
    pub async fn run(mut self, req: Req) -> AppResult<Resp> {
        self.inner.call(req).await
    }
}

/// Use async functions as router-level middleware
///
/// These run before any validation step, so they see the raw request.
///
/// # Example
///
/// ```rust,ignore
/// use tollgate::middleware::{middleware_from_fn, Next};
/// use tollgate::{AppResult, Req, Resp};
///
/// async fn tag(req: Req, next: Next) -> AppResult<Resp> {
///     let mut resp = next.run(req).await?;
///     resp.headers_mut().insert("x-checked", "1".parse().unwrap());
///     Ok(resp)
/// }
///
/// // router.with_layer(middleware_from_fn(tag));
/// ```
pub fn middleware_from_fn<F>(f: F) -> FromFnLayer<F> {
    FromFnLayer { f }
}

#[derive(Clone, Copy)]
pub struct FromFnLayer<F> {
    f: F,
}

impl<S, F> Layer<S> for FromFnLayer<F>
where
    F: Clone,
    S: Service<Req, Response = Resp, Error = AppError> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Service = MiddlewareFromFn<F>;

    fn layer(&self, inner: S) -> Self::Service {
        MiddlewareFromFn {
            f: self.f.clone(),
            inner: BoxCloneService::new(inner),
        }
    }
}

#[derive(Clone)]
pub struct MiddlewareFromFn<F> {
    f: F,
    inner: BoxCloneService<Req, Resp, AppError>,
}

impl<F, Fut> Service<Req> for MiddlewareFromFn<F>
where
    F: Fn(Req, Next) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = AppResult<Resp>> + Send + 'static,
{
    type Response = Resp;
    type Error = AppError;
    type Future = Fut;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Req) -> Self::Future {
        // `next` takes the instance that was polled ready
        let clone = self.inner.clone();
        let ready = std::mem::replace(&mut self.inner, clone);
        (self.f)(req, Next { inner: ready })
    }
}
