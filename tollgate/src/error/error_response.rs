use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// 宿主层错误的响应结构
///
/// 校验失败使用 `{ "errors": [...] }` 或自定义 payload，不使用此结构。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// HTTP 状态码
    pub status: u16,

    /// 错误代码（大写下划线格式，如 JSON_PARSE_ERROR）
    pub error: String,

    /// 人类可读的错误消息
    pub message: String,

    /// 详细错误信息（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// 请求追踪 ID（可选，用于日志关联）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,

    /// 错误发生时间戳（Unix 时间戳，秒）
    pub timestamp: u64,
}

impl ErrorResponse {
    /// 根据宿主层错误生成响应结构
    pub fn from_error(err: &super::AppError, trace_id: Option<String>) -> Self {
        Self {
            status: err.status_code().as_u16(),
            error: err.error_code(),
            message: err.message(),
            details: err.details(),
            trace_id,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        }
    }
}
