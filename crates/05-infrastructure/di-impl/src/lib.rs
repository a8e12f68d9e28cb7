//! # 依赖注入具体实现
//!
//! 提供注册表、候选选择、实例化器和应用入口的具体实现。
//!
//! 解析流程：
//!
//! 1. [`Registry::register`] 在解析前填充注册表
//! 2. [`run`] 按实现类型解析主组件（标签 `"default"`）
//! 3. 候选选择器在锁内筛选注册项并按标签消歧，释放锁后交给实例化器
//! 4. [`Instantiator`] 分配实例、挂载日志，并按字段声明顺序递归填充引用

pub mod instantiator;
pub mod ledger;
pub mod registry;
pub mod resolver;
pub mod runner;
pub mod validation;

pub use instantiator::Instantiator;
pub use ledger::{InitializedComponent, InitializedLedger};
pub use registry::{global_registry, register, Registry};
pub use resolver::{effective_tag, select_candidate, LookupKey};
pub use runner::{resolve_main, run, run_async};

#[cfg(test)]
mod tests;
