//! 实例化器
//!
//! 分配实现实例、挂载日志句柄，并按字段声明顺序填充依赖引用。

use crate::ledger::InitializedLedger;
use di_abstractions::{ComponentResolver, Registration, ResolveContext, ResolvedComponent};
use di_common::{DependencyError, DependencyResult};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, info, info_span};

/// 实例化器
pub struct Instantiator<'a> {
    /// 用于递归解析依赖字段
    resolver: &'a dyn ComponentResolver,
    /// 已初始化实例台账
    ledger: &'a InitializedLedger,
}

impl<'a> Instantiator<'a> {
    /// 创建实例化器
    pub fn new(resolver: &'a dyn ComponentResolver, ledger: &'a InitializedLedger) -> Self {
        Self { resolver, ledger }
    }

    /// 构造完成装配的实例
    ///
    /// 依赖字段使用同一个 `tag` 递归解析；任一字段失败则整体失败，
    /// 错误附带所属结构体与字段名。
    pub fn instantiate(
        &self,
        registration: &Registration,
        tag: &str,
        context: &mut ResolveContext,
    ) -> DependencyResult<ResolvedComponent> {
        context.push_type(registration.implementation())?;
        let result = self.build(registration, tag, context);
        context.pop_type();

        let component = result?;
        self.ledger.record(&component);

        if context.options().log_instantiation {
            info!(
                "实例化组件: {} as {} (tag={})",
                registration.implementation().short_name(),
                registration.capability().short_name(),
                tag
            );
        }
        Ok(component)
    }

    fn build(
        &self,
        registration: &Registration,
        tag: &str,
        context: &mut ResolveContext,
    ) -> DependencyResult<ResolvedComponent> {
        let owner = registration.implementation().short_name();
        let mut instance = registration.allocate();

        let logger = info_span!(
            "component",
            implementation = %owner,
            capability = %registration.capability().short_name(),
            tag = %tag,
        );
        match instance.logger_slot() {
            Some(slot) => slot.attach_logger(logger),
            None => {
                return Err(DependencyError::LoggerUnsupported {
                    type_name: registration.implementation().to_string(),
                })
            }
        }

        for field in instance.references() {
            let target = field.reference.target();
            debug!("填充字段 {}.{} -> {}", owner, field.name, target.short_name());

            let component = self
                .resolver
                .resolve_by_capability(&target, tag, context)
                .map_err(|e| e.in_field(owner, field.name))?;
            field
                .reference
                .assign(&component)
                .map_err(|e| e.in_field(owner, field.name))?;
        }

        let instance: Arc<dyn Any + Send + Sync> = Arc::from(instance.into_any());
        Ok(ResolvedComponent::new(registration.clone(), tag, instance))
    }
}
