//! 应用入口
//!
//! 按实现类型解析主组件（标签 `"default"`），再把实例交给调用方的启动函数。

use crate::registry::Registry;
use di_abstractions::{InstanceOf, Main};
use di_common::{DependencyError, DependencyResult, DEFAULT_TAG};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

/// 解析主组件
pub fn resolve_main<T>(registry: &Registry) -> DependencyResult<Arc<T>>
where
    T: InstanceOf<dyn Main>,
{
    info!("解析主组件: {}", std::any::type_name::<T>());
    registry.resolve_implementation::<T>(DEFAULT_TAG).map_err(|e| {
        error!("主组件解析失败: {}", e);
        e
    })
}

/// 解析主组件并执行启动函数
///
/// 解析错误通过 `E: From<DependencyError>` 原样返回；
/// 启动函数自身的错误不做任何包装。
pub fn run<T, E, F>(registry: &Registry, startup: F) -> Result<(), E>
where
    T: InstanceOf<dyn Main>,
    E: From<DependencyError>,
    F: FnOnce(Arc<T>) -> Result<(), E>,
{
    let main = resolve_main::<T>(registry)?;
    startup(main)
}

/// [`run`] 的异步版本，启动函数返回 future
pub async fn run_async<T, E, F, Fut>(registry: &Registry, startup: F) -> Result<(), E>
where
    T: InstanceOf<dyn Main>,
    E: From<DependencyError>,
    F: FnOnce(Arc<T>) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let main = resolve_main::<T>(registry)?;
    startup(main).await
}
