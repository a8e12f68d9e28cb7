//! 组件注册表实现

use crate::instantiator::Instantiator;
use crate::ledger::{InitializedComponent, InitializedLedger};
use crate::resolver::{effective_tag, select_candidate, LookupKey};
use di_abstractions::{
    Component, ComponentRegistry, ComponentResolver, Implementation, InstanceOf, Registration,
    ResolveContext, ResolvedComponent,
};
use di_common::{DependencyResult, ResolverOptions, TypeInfo};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// 进程级全局注册表，`#[component(auto_register)]` 生成的注册函数写入这里
static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// 获取全局注册表
pub fn global_registry() -> &'static Registry {
    &GLOBAL_REGISTRY
}

/// 向全局注册表追加注册项
pub fn register(registration: Registration) {
    GLOBAL_REGISTRY.register(registration);
}

/// 组件注册表
///
/// 注册项只追加、不去重。解析时在锁内筛选候选，
/// 释放锁后再实例化，依赖字段的递归解析不会重入同一把锁。
pub struct Registry {
    /// 按注册顺序保存的注册项
    registrations: Mutex<Vec<Registration>>,
    /// 已初始化实例台账
    ledger: InitializedLedger,
    /// 解析选项
    options: ResolverOptions,
}

impl Registry {
    /// 使用默认选项创建空注册表
    pub fn new() -> Self {
        Self::with_options(ResolverOptions::default())
    }

    /// 使用指定选项创建空注册表
    pub fn with_options(options: ResolverOptions) -> Self {
        Self {
            registrations: Mutex::new(Vec::new()),
            ledger: InitializedLedger::new(),
            options,
        }
    }

    /// 解析选项
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// 追加注册项
    pub fn register(&self, registration: Registration) {
        info!(
            "注册组件: {} as {} (tag={})",
            registration.implementation().short_name(),
            registration.capability().short_name(),
            registration.tag().unwrap_or("-")
        );
        self.registrations.lock().push(registration);
    }

    /// 注册项数量
    pub fn len(&self) -> usize {
        self.registrations.lock().len()
    }

    /// 是否没有任何注册项
    pub fn is_empty(&self) -> bool {
        self.registrations.lock().is_empty()
    }

    /// 按能力类型解析，返回能力句柄
    pub fn resolve<C>(&self, tag: &str) -> DependencyResult<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let mut context = ResolveContext::new(self.options.clone());
        self.resolve_by_capability(&TypeInfo::of::<C>(), tag, &mut context)?
            .capability_handle::<C>()
    }

    /// 按实现类型解析，返回具体实例
    pub fn resolve_implementation<I: Implementation>(&self, tag: &str) -> DependencyResult<Arc<I>> {
        let mut context = ResolveContext::new(self.options.clone());
        self.resolve_by_implementation(&TypeInfo::of::<I>(), tag, &mut context)?
            .downcast::<I>()
    }

    /// 已初始化实例台账的快照
    pub fn initialized(&self) -> Vec<InitializedComponent> {
        self.ledger.snapshot()
    }

    /// 在锁内筛选匹配的注册项
    pub(crate) fn candidates(&self, key: LookupKey, subject: &TypeInfo) -> Vec<Registration> {
        self.registrations
            .lock()
            .iter()
            .filter(|registration| key.matches(registration, subject))
            .cloned()
            .collect()
    }

    fn resolve_with(
        &self,
        key: LookupKey,
        subject: &TypeInfo,
        tag: &str,
        context: &mut ResolveContext,
    ) -> DependencyResult<ResolvedComponent> {
        let tag = effective_tag(tag);
        debug!("解析 {} (tag={}, depth={})", subject.short_name(), tag, context.depth());

        let matches = self.candidates(key, subject);
        let registration = select_candidate(key, subject, &matches, tag)?;
        Instantiator::new(self, &self.ledger).instantiate(&registration, tag, context)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentResolver for Registry {
    fn resolve_by_capability(
        &self,
        capability: &TypeInfo,
        tag: &str,
        context: &mut ResolveContext,
    ) -> DependencyResult<ResolvedComponent> {
        self.resolve_with(LookupKey::Capability, capability, tag, context)
    }

    fn resolve_by_implementation(
        &self,
        implementation: &TypeInfo,
        tag: &str,
        context: &mut ResolveContext,
    ) -> DependencyResult<ResolvedComponent> {
        self.resolve_with(LookupKey::Implementation, implementation, tag, context)
    }
}

impl ComponentRegistry for Registry {
    fn register(&self, registration: Registration) {
        Registry::register(self, registration);
    }

    fn registrations(&self) -> Vec<Registration> {
        Registry::registrations(self)
    }
}

impl Registry {
    /// 注册组件到其声明的能力类型
    pub fn register_component<I>(&self)
    where
        I: Component + InstanceOf<<I as Component>::Capability>,
    {
        self.register(Registration::component::<I>());
    }

    /// 所有注册项的快照，按注册顺序
    pub fn registrations(&self) -> Vec<Registration> {
        self.registrations.lock().clone()
    }
}
