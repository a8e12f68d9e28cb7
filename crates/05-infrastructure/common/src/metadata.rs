//! 元数据定义
//!
//! 提供能力类型与实现类型的运行时标识

use std::any::TypeId;
use std::fmt;
use uuid::Uuid;

/// 类型信息
///
/// 以 `TypeId` 判定类型同一性，名称只用于日志与错误信息。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 类型名称
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息，`T` 可以是 `dyn Trait`
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        Self {
            name: short_type_name(full),
            id: TypeId::of::<T>(),
            module_path: full.to_string(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// 是否为同一类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.module_path)
    }
}

/// 去掉模块路径，保留 `dyn ` 前缀和泛型参数
fn short_type_name(full: &str) -> String {
    let (prefix, rest) = match full.strip_prefix("dyn ") {
        Some(rest) => ("dyn ", rest),
        None => ("", full),
    };
    let head_end = rest.find('<').unwrap_or(rest.len());
    let (head, generics) = rest.split_at(head_end);
    let short = head.rsplit("::").next().unwrap_or(head);
    format!("{prefix}{short}{generics}")
}

/// 注册项指纹
///
/// 对 (能力类型, 实现类型) 的完整路径做 UUID v5（基于 SHA-1）摘要。
pub fn fingerprint(capability: &TypeInfo, implementation: &TypeInfo) -> Uuid {
    let mut bytes = Vec::with_capacity(capability.module_path.len() + implementation.module_path.len() + 1);
    bytes.extend_from_slice(capability.module_path.as_bytes());
    bytes.push(0);
    bytes.extend_from_slice(implementation.module_path.as_bytes());
    Uuid::new_v5(&Uuid::NAMESPACE_OID, &bytes)
}
