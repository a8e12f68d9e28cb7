//! 组件注册表抽象接口

use crate::component::{Component, InstanceOf};
use crate::registration::Registration;
use di_common::TypeInfo;

/// 组件注册表 trait
///
/// 只追加、不去重；标签唯一性在解析时校验。
pub trait ComponentRegistry: Send + Sync {
    /// 注册 (能力类型, 实现类型)
    fn register(&self, registration: Registration);

    /// 所有注册项的快照，按注册顺序
    fn registrations(&self) -> Vec<Registration>;

    /// 注册组件
    fn register_component<I>(&self)
    where
        I: Component + InstanceOf<<I as Component>::Capability>,
        Self: Sized,
    {
        self.register(Registration::component::<I>());
    }

    /// 指定能力类型是否有注册项
    fn is_registered(&self, capability: &TypeInfo) -> bool {
        self.registrations()
            .iter()
            .any(|registration| registration.capability().id == capability.id)
    }
}
