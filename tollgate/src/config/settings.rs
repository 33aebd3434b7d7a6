use anyhow::Error;
use config::Config;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::OnceLock;

/// 默认请求体上限：2 MiB
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// 按优先级合并配置源
///
/// 1. `./tollgate.toml`
/// 2. `./tollgate.{CONFIG_ENV}.toml`，未设置 CONFIG_ENV 时调试构建为 dev，发布构建为 prod
/// 3. `TOLLGATE__` 前缀的环境变量，例如 `TOLLGATE__VALIDATION__BODY_LIMIT=1024`
pub fn load_config_sources() -> Result<Config, Error> {
    let env = env::var("CONFIG_ENV").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "dev".to_string()
        } else {
            "prod".to_string()
        }
    });
    Ok(Config::builder()
        .set_default("validation.log_rejections", true)?
        .set_default("validation.body_limit", DEFAULT_BODY_LIMIT as u64)?
        .add_source(config::File::with_name("./tollgate").required(false))
        .add_source(config::File::with_name(&format!("./tollgate.{}", env)).required(false))
        .add_source(config::Environment::with_prefix("TOLLGATE").separator("__"))
        .build()?)
}

/// 校验相关配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ValidationSettings {
    /// 校验失败时以 warn 级别记录，关闭后降为 debug
    pub log_rejections: bool,
    /// 读取请求体时允许的最大字节数，超出返回 413
    pub body_limit: usize,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            log_rejections: true,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub validation: ValidationSettings,
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

impl Settings {
    /// 从配置文件与环境变量加载
    pub fn load() -> Result<Self, Error> {
        Ok(load_config_sources()?.try_deserialize()?)
    }

    /// 进程级配置，首次访问时加载；加载失败时记录警告并使用默认值
    pub fn global() -> &'static Settings {
        SETTINGS.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                tracing::warn!("Failed to load settings, using defaults: {:?}", e);
                Settings::default()
            })
        })
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.validation.body_limit = limit;
        self
    }

    pub fn with_log_rejections(mut self, enabled: bool) -> Self {
        self.validation.log_rejections = enabled;
        self
    }
}
