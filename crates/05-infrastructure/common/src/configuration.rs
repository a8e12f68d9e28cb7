//! 解析器选项与加载

use crate::errors::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "DI";

/// 解析器选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// 是否启用循环依赖检测
    pub detect_cycles: bool,
    /// 最大解析深度，0 表示不限制
    pub max_depth: usize,
    /// 是否在 info 级别记录每次实例化
    pub log_instantiation: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_depth: 100,
            log_instantiation: false,
        }
    }
}

impl ResolverOptions {
    /// 不做任何保护的选项，递归依赖会无界展开直到栈溢出
    pub fn unguarded() -> Self {
        Self {
            detect_cycles: false,
            max_depth: 0,
            ..Self::default()
        }
    }

    /// 从可选的配置文件和 `DI_` 前缀环境变量加载
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_from(path, ENV_PREFIX)
    }

    /// 使用指定环境变量前缀加载
    pub fn load_from(path: Option<&Path>, env_prefix: &str) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("加载解析器配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(env_prefix).try_parsing(true))
            .build()
            .map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;

        let options: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;
        options.validate()?;
        Ok(options)
    }

    /// 验证选项组合
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_depth == 1 {
            return Err(ConfigError::ValidationError {
                message: "max_depth 为 1 时只能解析没有依赖字段的组件，至少需要 2".to_string(),
            });
        }
        Ok(())
    }
}
