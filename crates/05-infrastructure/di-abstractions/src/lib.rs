//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件注册和依赖装配的核心接口。
//!
//! ## 核心接口
//!
//! - [`Registration`] - 不可变的 (能力类型, 实现类型) 注册项
//! - [`Implementation`] - 实现类型的能力检查（日志挂载、引用字段）
//! - [`Implements`] - 嵌入实现结构体的基础字段
//! - [`Ref`] - 由解析器填充的依赖字段
//! - [`ComponentResolver`] - 按能力或实现类型解析组件
//! - [`ComponentRegistry`] - 组件注册表接口

pub mod component;
pub mod reference;
pub mod registration;
pub mod registry;
pub mod resolver;

pub use component::*;
pub use reference::*;
pub use registration::*;
pub use registry::*;
pub use resolver::*;

pub use di_common::{DependencyError, DependencyResult, TypeInfo, DEFAULT_TAG};
