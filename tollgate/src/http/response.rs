use crate::error::AppError;
use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::{HeaderMap, Response, StatusCode};
use serde::Serialize;
use tollgate_core::{Resp, ResponseContext, empty_body, full_body};

/// 将一个类型转换为 HTTP 响应的通用能力
///
/// handler 的返回值只要实现了该 trait，就可以被框架自动转换为响应。
/// 已为 String、&str、Json<T>、Value、Result、()、StatusCode、(StatusCode, T)
/// 以及 [`ResponseContext`] 提供实现。
pub trait IntoResponse {
    fn into_response(self) -> Resp;
}

/// JSON 响应包装器
#[derive(Debug, Clone)]
pub struct Json<T>(pub T);

fn with_content_type(status: StatusCode, content_type: &'static str, body: Bytes) -> Resp {
    let mut resp = Response::new(full_body(body));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}

fn empty(status: StatusCode) -> Resp {
    let mut resp = Response::new(empty_body());
    *resp.status_mut() = status;
    resp
}

/// 序列化为 JSON 响应，序列化失败时返回 500
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Resp {
    match serde_json::to_vec(value) {
        Ok(bytes) => with_content_type(status, "application/json", bytes.into()),
        Err(e) => {
            tracing::error!("failed to serialize response body: {}", e);
            empty(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Resp {
        with_content_type(StatusCode::OK, "text/plain; charset=utf-8", self.into())
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Resp {
        with_content_type(StatusCode::OK, "text/plain; charset=utf-8", self.into())
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Resp {
        json_response(StatusCode::OK, &self.0)
    }
}

impl IntoResponse for serde_json::Value {
    fn into_response(self) -> Resp {
        json_response(StatusCode::OK, &self)
    }
}

impl IntoResponse for Resp {
    fn into_response(self) -> Resp {
        self
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Resp {
        empty(StatusCode::OK)
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Resp {
        empty(self)
    }
}

impl<T: IntoResponse> IntoResponse for (StatusCode, T) {
    fn into_response(self) -> Resp {
        let mut resp = self.1.into_response();
        *resp.status_mut() = self.0;
        resp
    }
}

impl<T: IntoResponse> IntoResponse for (HeaderMap, T) {
    fn into_response(self) -> Resp {
        let mut resp = self.1.into_response();
        resp.headers_mut().extend(self.0);
        resp
    }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: IntoResponse,
{
    fn into_response(self) -> Resp {
        match self {
            Ok(t) => t.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

impl IntoResponse for anyhow::Error {
    fn into_response(self) -> Resp {
        AppError::from(self).into_response()
    }
}

/// 按写入的状态码、头部与 JSON 负载生成响应，未写入负载时响应体为空
impl IntoResponse for ResponseContext {
    fn into_response(self) -> Resp {
        let (status, headers, payload, _) = self.into_parts();
        let mut resp = match payload {
            Some(value) => json_response(status, &value),
            None => empty(status),
        };
        resp.headers_mut().extend(headers);
        resp
    }
}
