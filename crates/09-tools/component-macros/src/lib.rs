//! # Component Macros
//!
//! 这个 crate 提供了声明组件实现的派生宏，在编译期生成
//! 运行时注册表所需的全部元数据，取代反射式的字段扫描。
//!
//! ## 核心宏
//!
//! - [`Component`] - 生成 `Implementation`、`InstanceOf` 和 `Component` 实现
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use component_macros::Component;
//! use di_abstractions::{Implements, Ref};
//!
//! pub trait SecondService: Send + Sync {
//!     fn do_something_else(&self);
//! }
//!
//! #[derive(Component)]
//! struct SecondServiceCloud {
//!     #[component(tag = "cloud")]
//!     base: Implements<dyn SecondService>,
//! }
//!
//! #[derive(Component)]
//! #[component(auto_register)]
//! struct App {
//!     base: Implements<dyn di_abstractions::Main>,
//!     second: Ref<dyn SecondService>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod component;
mod utils;

/// 组件派生宏
///
/// 识别规则：
///
/// - 类型名为 `Implements<C>` 的字段是基础字段，`C` 为能力类型，必须恰好一个
/// - 类型名为 `Ref<T>` 的字段是依赖引用，按声明顺序填充
///
/// # 参数
///
/// 结构体上：
///
/// - `name = "custom_name"` - 自定义组件名称
/// - `tag = "cloud"` - 变体标签（也可以写在基础字段上）
/// - `auto_register` - 通过 `ctor` 在加载时注册到全局注册表
///
/// 字段上：
///
/// - `tag = "cloud"` - 仅用于基础字段
/// - `base` - 将类型别名字段视为基础字段
/// - `reference` - 将类型别名字段视为依赖引用
/// - `skip` - 不参与识别
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_component_impl(input)
}
