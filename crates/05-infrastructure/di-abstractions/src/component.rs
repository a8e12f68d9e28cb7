//! 组件能力标记
//!
//! 取代运行时反射：实现类型通过 trait 声明自己能挂载日志、
//! 拥有哪些引用字段、以及能以哪个能力类型对外提供。

use crate::reference::ReferenceField;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::Span;

/// 可挂载日志句柄的能力
pub trait AttachLogger {
    /// 挂载日志句柄
    fn attach_logger(&mut self, logger: Span);
}

/// 实现类型 trait
///
/// 通常由 `#[derive(Component)]` 生成。
pub trait Implementation: Any + Send + Sync {
    /// 分配一个所有字段均为默认值的新实例
    fn allocate() -> Self
    where
        Self: Sized;

    /// 声明元数据上的变体标签，`None` 表示未打标签
    fn tag() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }

    /// 日志挂载点，返回 `None` 表示实现缺少 `Implements<_>` 基础字段
    fn logger_slot(&mut self) -> Option<&mut dyn AttachLogger> {
        None
    }

    /// 按字段声明顺序列出所有引用字段
    fn references(&self) -> Vec<ReferenceField<'_>> {
        Vec::new()
    }

    /// 转换为类型擦除的实例
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

/// 实现类型可以作为能力 `C` 对外提供
pub trait InstanceOf<C: ?Sized>: Implementation {
    /// 将具体实例转换为能力句柄
    fn upcast(self: Arc<Self>) -> Arc<C>;
}

/// 声明了唯一能力类型的组件
pub trait Component: Implementation + Sized {
    /// 组件实现的能力类型，通常是 `dyn Trait`
    type Capability: ?Sized + Send + Sync + 'static;

    /// 组件名称
    fn component_name() -> &'static str;
}

/// 嵌入到实现结构体中的基础字段
///
/// 表示该结构体实现了能力 `C`，并持有解析时挂载的日志句柄。
///
/// ```ignore
/// #[derive(Component)]
/// struct LruCache {
///     #[component(tag = "memory")]
///     base: Implements<dyn Cache>,
///     store: Ref<dyn Storage>,
/// }
/// ```
pub struct Implements<C: ?Sized> {
    logger: Span,
    _capability: PhantomData<fn() -> Box<C>>,
}

impl<C: ?Sized> Implements<C> {
    /// 与该组件关联的日志句柄
    pub fn logger(&self) -> &Span {
        &self.logger
    }
}

impl<C: ?Sized> Default for Implements<C> {
    fn default() -> Self {
        Self {
            logger: Span::none(),
            _capability: PhantomData,
        }
    }
}

impl<C: ?Sized> AttachLogger for Implements<C> {
    fn attach_logger(&mut self, logger: Span) {
        self.logger = logger;
    }
}

impl<C: ?Sized> fmt::Debug for Implements<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implements")
            .field("capability", &std::any::type_name::<C>())
            .field("logger", &self.logger)
            .finish()
    }
}

/// 应用主组件的标记能力
///
/// 没有任何方法；嵌入 `Implements<dyn Main>` 的结构体即为主组件。
pub trait Main: Send + Sync {}

impl<T: ?Sized + Send + Sync> Main for T {}
