//! # DI Common
//!
//! 组件注册与依赖装配的公共基础设施。
//!
//! ## 核心内容
//!
//! - [`DependencyError`] - 解析与实例化过程中的配置错误
//! - [`TypeInfo`] - 能力类型 / 实现类型的运行时标识
//! - [`ResolverOptions`] - 解析器选项（循环检测、最大深度）
//! - [`LoggingConfig`] - 日志初始化配置
//!
//! ## 设计原则
//!
//! - 所有解析失败都以错误返回，不使用 panic
//! - 基于 `TypeId` 的类型同一性判断，而非结构兼容

pub mod configuration;
pub mod errors;
pub mod logging;
pub mod metadata;

pub use configuration::*;
pub use errors::*;
pub use logging::*;
pub use metadata::*;

/// 未指定变体标签时使用的标签
pub const DEFAULT_TAG: &str = "default";
