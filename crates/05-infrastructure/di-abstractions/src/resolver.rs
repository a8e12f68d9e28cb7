//! 组件解析器抽象接口
//!
//! 提供候选选择和组件实例化之间的接缝

use crate::registration::ResolvedComponent;
use di_common::{DependencyError, DependencyResult, ResolverOptions, TypeInfo};

/// 组件解析器 trait
///
/// 实例化器通过它递归解析依赖字段
pub trait ComponentResolver: Send + Sync {
    /// 按能力类型解析
    fn resolve_by_capability(
        &self,
        capability: &TypeInfo,
        tag: &str,
        context: &mut ResolveContext,
    ) -> DependencyResult<ResolvedComponent>;

    /// 按实现类型解析
    fn resolve_by_implementation(
        &self,
        implementation: &TypeInfo,
        tag: &str,
        context: &mut ResolveContext,
    ) -> DependencyResult<ResolvedComponent>;
}

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前正在构造的实现类型链，用于检测循环依赖
    resolution_chain: Vec<TypeInfo>,
    /// 解析选项
    options: ResolverOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 解析选项
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }

    /// 添加类型到解析链
    pub fn push_type(&mut self, implementation: &TypeInfo) -> DependencyResult<()> {
        if self.options.detect_cycles && self.resolution_chain.iter().any(|t| t.id == implementation.id) {
            return Err(DependencyError::CircularDependency {
                dependency_chain: self.describe_chain(Some(implementation)),
            });
        }
        if self.options.max_depth > 0 && self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::MaxDepthExceeded {
                max_depth: self.options.max_depth,
                dependency_chain: self.describe_chain(Some(implementation)),
            });
        }
        self.resolution_chain.push(implementation.clone());
        Ok(())
    }

    /// 从解析链中移除类型
    pub fn pop_type(&mut self) {
        self.resolution_chain.pop();
    }

    /// 用 ` -> ` 连接解析链
    pub fn describe_chain(&self, next: Option<&TypeInfo>) -> String {
        self.resolution_chain
            .iter()
            .chain(next)
            .map(|t| t.short_name().to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(ResolverOptions::default())
    }
}
