use super::AppError;

/// 宿主层标准 Result 类型
///
/// 请求读取、路由分发等可能失败的操作都返回它，错误会被统一转换为 JSON 响应。
pub type AppResult<T> = Result<T, AppError>;
