//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 依赖解析错误类型
///
/// 除 [`DependencyError::LoggerUnsupported`] 外都属于配置错误，
/// 会原样经由入口返回给调用方。
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("能力 {capability} 存在多个实现，请为实现添加变体标签")]
    AmbiguousImplementation { capability: String },

    #[error("能力 {capability} 的变体标签 {tag:?} 重复")]
    DuplicateTag { capability: String, tag: String },

    #[error("未找到能力 {capability} 的实现，是否忘记注册？")]
    ImplementationNotFound { capability: String },

    #[error("组件 {type_name} 不支持挂载日志，需要嵌入 Implements<_> 基础字段")]
    LoggerUnsupported { type_name: String },

    #[error("引用类型不匹配: 期望 {expected}, 实际 {actual}")]
    ReferenceTypeMismatch { expected: String, actual: String },

    #[error("引用 {target} 已被填充")]
    ReferenceAlreadyAssigned { target: String },

    #[error("设置字段 {owner}.{field} 失败: {source}")]
    FieldResolution {
        owner: String,
        field: String,
        #[source]
        source: Box<DependencyError>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过上限 {max_depth}: {dependency_chain}")]
    MaxDepthExceeded {
        max_depth: usize,
        dependency_chain: String,
    },

    #[error("组件类型转换失败: 期望 {expected}, 实际 {actual}")]
    ComponentTypeMismatch { expected: String, actual: String },
}

impl DependencyError {
    /// 为字段填充失败附加所属结构体与字段名
    pub fn in_field(self, owner: impl Into<String>, field: impl Into<String>) -> Self {
        Self::FieldResolution {
            owner: owner.into(),
            field: field.into(),
            source: Box::new(self),
        }
    }

    /// 沿 `FieldResolution` 链找到最内层的错误
    pub fn root_cause(&self) -> &DependencyError {
        match self {
            Self::FieldResolution { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
