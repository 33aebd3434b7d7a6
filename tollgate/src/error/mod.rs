/// 统一错误处理模块
///
/// 宿主层（请求读取、路由匹配等）的错误类型与错误响应格式。
/// 校验失败不经过这里，由校验步骤直接写出 400 响应。
pub mod app_error;
pub mod error_response;
pub mod result;

pub use app_error::{AppError, TRACE_ID, current_trace_id};
pub use error_response::ErrorResponse;
pub use result::AppResult;
