use super::handler::Handler;
use crate::config::Settings;
use crate::error::AppError;
use crate::http::request;
use crate::http::response::IntoResponse;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tollgate_core::{Flow, Middleware, Req, Resp, ResponseContext, ValidationStep, run_chain};
use tower::Service;

/// Loads the request, runs the validation steps in order, then the handler.
///
/// A step that rejects writes a `400` into the response context; the
/// remaining steps and the handler are skipped and that response is sent.
pub struct PipelineSvc<H> {
    steps: Arc<[ValidationStep]>,
    handler: H,
}

impl<H: Clone> Clone for PipelineSvc<H> {
    fn clone(&self) -> Self {
        Self {
            steps: self.steps.clone(),
            handler: self.handler.clone(),
        }
    }
}

impl<H: Handler> PipelineSvc<H> {
    pub fn new(steps: Vec<ValidationStep>, handler: H) -> Self {
        Self {
            steps: steps.into(),
            handler,
        }
    }

    pub fn steps(&self) -> &[ValidationStep] {
        &self.steps
    }
}

impl<H: Handler> Service<Req> for PipelineSvc<H> {
    type Response = Resp;
    type Error = AppError;
    type Future = BoxFuture<'static, Result<Resp, AppError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut req: Req) -> Self::Future {
        let steps = self.steps.clone();
        let handler = self.handler.clone();
        let settings = req
            .extensions_mut()
            .remove::<Arc<Settings>>()
            .unwrap_or_else(|| Arc::new(Settings::global().clone()));

        Box::pin(async move {
            let mut ctx = request::load(req, settings.validation.body_limit).await?;
            let mut res = ResponseContext::new();

            let chain: Vec<&dyn Middleware> = steps.iter().map(|s| s as &dyn Middleware).collect();
            if run_chain(&chain, &mut ctx, &mut res) == Flow::Halt {
                if settings.validation.log_rejections {
                    tracing::warn!(
                        method = %ctx.method(),
                        path = %ctx.uri().path(),
                        status = %res.status_code(),
                        "Request rejected by validation"
                    );
                } else {
                    tracing::debug!(
                        method = %ctx.method(),
                        path = %ctx.uri().path(),
                        status = %res.status_code(),
                        "Request rejected by validation"
                    );
                }
                return Ok(res.into_response());
            }

            Ok(handler.call(ctx, res).await)
        })
    }
}
