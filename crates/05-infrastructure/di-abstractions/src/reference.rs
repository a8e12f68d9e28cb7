//! 依赖引用字段

use crate::registration::ResolvedComponent;
use di_common::{DependencyError, DependencyResult, TypeInfo};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// 引用字段 trait
///
/// 实例化器只通过此接口识别并填充依赖字段。
pub trait Reference: Send + Sync {
    /// 引用指向的能力类型
    fn target(&self) -> TypeInfo;

    /// 用解析结果填充引用，只能成功一次
    fn assign(&self, component: &ResolvedComponent) -> DependencyResult<()>;

    /// 是否已经填充
    fn is_assigned(&self) -> bool;
}

/// 带字段名的引用
#[derive(Clone, Copy)]
pub struct ReferenceField<'a> {
    /// 字段名
    pub name: &'static str,
    /// 引用本身
    pub reference: &'a dyn Reference,
}

impl<'a> ReferenceField<'a> {
    /// 创建引用字段描述
    pub fn new(name: &'static str, reference: &'a dyn Reference) -> Self {
        Self { name, reference }
    }
}

impl fmt::Debug for ReferenceField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceField")
            .field("name", &self.name)
            .field("target", &self.reference.target())
            .field("assigned", &self.reference.is_assigned())
            .finish()
    }
}

/// 指向能力 `C` 的依赖字段
///
/// 实例化时由解析器填充，之后通过 [`Ref::get`] 读取。
pub struct Ref<C: ?Sized> {
    value: OnceCell<Arc<C>>,
}

impl<C: ?Sized> Ref<C> {
    /// 获取被引用的组件
    ///
    /// # Panics
    ///
    /// 引用尚未填充时 panic。入口在调用启动函数前已填充全部引用，
    /// 只有实现自身的缺陷才会走到这里。
    pub fn get(&self) -> &C {
        match self.value.get() {
            Some(value) => value.as_ref(),
            None => panic!("引用 {} 尚未填充", std::any::type_name::<C>()),
        }
    }

    /// 获取被引用的组件，未填充时返回 `None`
    pub fn try_get(&self) -> Option<&Arc<C>> {
        self.value.get()
    }
}

impl<C: ?Sized> Default for Ref<C> {
    fn default() -> Self {
        Self {
            value: OnceCell::new(),
        }
    }
}

impl<C: ?Sized + Send + Sync + 'static> Reference for Ref<C> {
    fn target(&self) -> TypeInfo {
        TypeInfo::of::<C>()
    }

    fn assign(&self, component: &ResolvedComponent) -> DependencyResult<()> {
        let handle = component.capability_handle::<C>()?;
        self.value
            .set(handle)
            .map_err(|_| DependencyError::ReferenceAlreadyAssigned {
                target: self.target().to_string(),
            })
    }

    fn is_assigned(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<C: ?Sized> fmt::Debug for Ref<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ref")
            .field("target", &std::any::type_name::<C>())
            .field("assigned", &self.value.get().is_some())
            .finish()
    }
}
