//! 日志初始化

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 默认过滤指令，`RUST_LOG` 优先
    pub filter: String,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            show_target: true,
            show_thread_ids: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            filter: "debug".to_string(),
            show_target: true,
            show_thread_ids: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            filter: "info".to_string(),
            show_target: false,
            show_thread_ids: false,
            json_format: true,
        }
    }
}

/// 初始化全局日志订阅者
///
/// 已经初始化过时返回 `false`，便于在测试中重复调用。
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.show_target)
        .with_thread_ids(config.show_thread_ids);

    let result = if config.json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
    result.is_ok()
}
