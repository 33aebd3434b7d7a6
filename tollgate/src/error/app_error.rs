use super::error_response::ErrorResponse;
use crate::http::response::{IntoResponse, json_response};
use hyper::StatusCode;
use serde_json::json;
use std::convert::Infallible;
use std::fmt;
use tollgate_core::{Resp, TollgateError};

tokio::task_local! {
    /// 当前请求的 trace_id，由路由服务在处理请求时设置
    pub static TRACE_ID: String;
}

/// 获取当前请求的 trace_id，不在请求上下文中时返回 None
pub fn current_trace_id() -> Option<String> {
    TRACE_ID.try_with(|id| id.clone()).ok()
}

/// 宿主层错误类型
///
/// 覆盖请求体读取、解析与路由分发中的失败。每个变体对应一个状态码和错误代码，
/// 并通过 [`IntoResponse`] 转换为 [`ErrorResponse`] JSON。
#[derive(Debug)]
pub enum AppError {
    /// 400 Bad Request - 请求无法读取
    BadRequest(String),

    /// 404 Not Found - 没有匹配的路由
    NotFound(String),

    /// 413 Payload Too Large - 请求体超过配置的上限
    PayloadTooLarge(String),

    /// 500 Internal Server Error - 内部错误
    InternalServerError(String),

    /// 请求体不是合法 JSON
    JsonParseError(serde_json::Error),

    /// 查询字符串或表单无法解析
    UrlEncodedParseError(serde_urlencoded::de::Error),

    /// 自定义错误，允许完全控制状态码和响应内容
    Custom {
        status: StatusCode,
        error_code: String,
        message: String,
        details: Option<serde_json::Value>,
    },
}

impl AppError {
    /// 创建自定义错误
    pub fn custom(
        status: StatusCode,
        error_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Custom {
            status,
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// 创建带详细信息的自定义错误
    pub fn custom_with_details(
        status: StatusCode,
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::Custom {
            status,
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::JsonParseError(_) | Self::UrlEncodedParseError(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Custom { status, .. } => *status,
        }
    }

    /// 获取错误代码
    pub fn error_code(&self) -> String {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            Self::JsonParseError(_) => "JSON_PARSE_ERROR",
            Self::UrlEncodedParseError(_) => "URL_ENCODED_PARSE_ERROR",
            Self::Custom { error_code, .. } => return error_code.clone(),
        }
        .to_string()
    }

    /// 获取错误消息
    pub fn message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::NotFound(msg)
            | Self::PayloadTooLarge(msg)
            | Self::InternalServerError(msg) => msg.clone(),
            Self::JsonParseError(e) => format!("Invalid JSON: {}", e),
            Self::UrlEncodedParseError(e) => format!("Invalid URL encoding: {}", e),
            Self::Custom { message, .. } => message.clone(),
        }
    }

    /// 获取错误详细信息
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::JsonParseError(e) => Some(json!({
                "line": e.line(),
                "column": e.column(),
            })),
            Self::Custom { details, .. } => details.clone(),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

// ============ From 实现：自动转换常见错误类型 ============

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseError(err)
    }
}

impl From<serde_urlencoded::de::Error> for AppError {
    fn from(err: serde_urlencoded::de::Error) -> Self {
        Self::UrlEncodedParseError(err)
    }
}

impl From<TollgateError> for AppError {
    fn from(err: TollgateError) -> Self {
        Self::BadRequest(format!("Failed to read request body: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalServerError(err.to_string())
    }
}

impl From<Infallible> for AppError {
    fn from(err: Infallible) -> Self {
        match err {}
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for AppError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::InternalServerError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Resp {
        let status = self.status_code();
        let error_response = ErrorResponse::from_error(&self, current_trace_id());

        // 记录服务器内部错误（5xx）
        if status.is_server_error() {
            tracing::error!(
                error_code = %error_response.error,
                message = %error_response.message,
                trace_id = ?error_response.trace_id,
                "Internal server error"
            );
        }

        json_response(status, &error_response)
    }
}
