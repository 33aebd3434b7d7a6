use crate::error::{AppError, TRACE_ID};
use crate::http::response::IntoResponse;
use crate::router::Router;
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use std::time::{SystemTime, UNIX_EPOCH};
use tollgate_core::{Req, Resp};
use tower::Service;

#[derive(Clone)]
pub struct RouterSvc {
    pub router: Router,
}

impl Service<Req> for RouterSvc {
    type Response = Resp;
    type Error = AppError;
    type Future = BoxFuture<'static, Result<Resp, AppError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut req: Req) -> Self::Future {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let result = self.router.find_handler(&method, &path);
        req.extensions_mut().insert(self.router.settings.clone());

        // 优先从请求头获取 trace_id，没有则生成新的
        let trace_id = extract_or_generate_trace_id(&req);
        let start = std::time::Instant::now();

        let task_future = {
            let trace_id = trace_id.clone();
            async move {
                tracing::debug!(
                    method = %method,
                    path = %path,
                    trace_id = %trace_id,
                    "Request started"
                );
                let resp_result = match result {
                    Some((mut handler, params)) => {
                        req.extensions_mut().insert(params);
                        handler.call(req).await
                    }
                    None => Err(AppError::NotFound(format!("No route for {} {}", method, path))),
                };
                let elapsed = start.elapsed();
                match &resp_result {
                    Ok(response) => tracing::debug!(
                        method = %method,
                        path = %path,
                        trace_id = %trace_id,
                        status = %response.status(),
                        elapsed_ms = elapsed.as_millis(),
                        "Request completed"
                    ),
                    Err(err) => tracing::debug!(
                        method = %method,
                        path = %path,
                        trace_id = %trace_id,
                        status = %err.status_code(),
                        elapsed_ms = elapsed.as_millis(),
                        err = %err,
                        "Request completed with error"
                    ),
                }
                Ok(resp_result.unwrap_or_else(|e| e.into_response()))
            }
        };
        Box::pin(TRACE_ID.scope(trace_id, task_future))
    }
}

/// 从请求中提取或生成 trace_id
///
/// 按优先级尝试:
/// 1. `x-trace-id` 请求头
/// 2. `x-request-id` 请求头
/// 3. 基于时间戳生成
fn extract_or_generate_trace_id(req: &Req) -> String {
    req.headers()
        .get("x-trace-id")
        .or_else(|| req.headers().get("x-request-id"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(generate_trace_id)
}

/// 格式: `trace-{timestamp_micros}-{thread}`
fn generate_trace_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros())
        .unwrap_or_default();
    let thread_id = std::thread::current().id();
    format!("trace-{:x}-{:?}", timestamp, thread_id)
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}
