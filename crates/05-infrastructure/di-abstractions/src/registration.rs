//! 注册项

use crate::component::{Component, Implementation, InstanceOf};
use di_common::{fingerprint, DependencyError, DependencyResult, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// 分配零值实例的函数
pub type AllocateFn = fn() -> Box<dyn Implementation>;

/// 将类型擦除的具体实例转换为能力句柄（装箱的 `Arc<C>`）
pub type ProvideFn = fn(&Arc<dyn Any + Send + Sync>) -> Option<Box<dyn Any + Send + Sync>>;

/// 注册项：不可变的 (能力类型, 实现类型) 对
#[derive(Clone)]
pub struct Registration {
    capability: TypeInfo,
    implementation: TypeInfo,
    tag: Option<&'static str>,
    allocate: AllocateFn,
    provide: ProvideFn,
}

impl Registration {
    /// 将实现类型 `I` 注册为能力 `C`
    pub fn of<C, I>() -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        I: InstanceOf<C>,
    {
        Self {
            capability: TypeInfo::of::<C>(),
            implementation: TypeInfo::of::<I>(),
            tag: I::tag(),
            allocate: allocate_boxed::<I>,
            provide: provide_handle::<C, I>,
        }
    }

    /// 按组件声明的能力类型注册
    pub fn component<I>() -> Self
    where
        I: Component + InstanceOf<<I as Component>::Capability>,
    {
        Self::of::<I::Capability, I>()
    }

    /// 能力类型
    pub fn capability(&self) -> &TypeInfo {
        &self.capability
    }

    /// 实现类型
    pub fn implementation(&self) -> &TypeInfo {
        &self.implementation
    }

    /// 实现声明的变体标签
    pub fn tag(&self) -> Option<&'static str> {
        self.tag
    }

    /// 注册项指纹
    pub fn fingerprint(&self) -> Uuid {
        fingerprint(&self.capability, &self.implementation)
    }

    /// 分配新的零值实例
    pub fn allocate(&self) -> Box<dyn Implementation> {
        (self.allocate)()
    }

    /// 把具体实例转换为本注册项能力类型的句柄
    pub fn provide(
        &self,
        instance: &Arc<dyn Any + Send + Sync>,
    ) -> DependencyResult<Box<dyn Any + Send + Sync>> {
        (self.provide)(instance).ok_or_else(|| DependencyError::ComponentTypeMismatch {
            expected: self.implementation.to_string(),
            actual: "<unknown>".to_string(),
        })
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("capability", &self.capability.module_path)
            .field("implementation", &self.implementation.module_path)
            .field("tag", &self.tag)
            .field("allocate", &"<function>")
            .finish()
    }
}

fn allocate_boxed<I: Implementation>() -> Box<dyn Implementation> {
    Box::new(I::allocate())
}

fn provide_handle<C, I>(instance: &Arc<dyn Any + Send + Sync>) -> Option<Box<dyn Any + Send + Sync>>
where
    C: ?Sized + Send + Sync + 'static,
    I: InstanceOf<C>,
{
    let concrete = Arc::clone(instance).downcast::<I>().ok()?;
    let handle: Arc<C> = <I as InstanceOf<C>>::upcast(concrete);
    Some(Box::new(handle))
}

/// 解析结果：完成装配的实例及其来源
#[derive(Clone)]
pub struct ResolvedComponent {
    registration: Registration,
    tag: String,
    instance: Arc<dyn Any + Send + Sync>,
}

impl ResolvedComponent {
    /// 创建解析结果
    pub fn new(registration: Registration, tag: impl Into<String>, instance: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            registration,
            tag: tag.into(),
            instance,
        }
    }

    /// 被选中的注册项
    pub fn registration(&self) -> &Registration {
        &self.registration
    }

    /// 解析时使用的标签
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// 类型擦除的具体实例
    pub fn instance(&self) -> &Arc<dyn Any + Send + Sync> {
        &self.instance
    }

    /// 以能力 `C` 的句柄形式获取实例
    pub fn capability_handle<C>(&self) -> DependencyResult<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let handle = self.registration.provide(&self.instance)?;
        handle
            .downcast::<Arc<C>>()
            .map(|handle| *handle)
            .map_err(|_| DependencyError::ReferenceTypeMismatch {
                expected: TypeInfo::of::<C>().to_string(),
                actual: self.registration.capability().to_string(),
            })
    }

    /// 以具体实现类型获取实例
    pub fn downcast<I: Implementation>(&self) -> DependencyResult<Arc<I>> {
        Arc::clone(&self.instance)
            .downcast::<I>()
            .map_err(|_| DependencyError::ComponentTypeMismatch {
                expected: TypeInfo::of::<I>().to_string(),
                actual: self.registration.implementation().to_string(),
            })
    }
}

impl fmt::Debug for ResolvedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedComponent")
            .field("registration", &self.registration)
            .field("tag", &self.tag)
            .finish()
    }
}
