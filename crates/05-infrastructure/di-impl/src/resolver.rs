//! 候选选择
//!
//! 在注册项中按能力类型或实现类型筛选，并按变体标签消歧。

use di_abstractions::Registration;
use di_common::{DependencyError, DependencyResult, TypeInfo, DEFAULT_TAG};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 查找键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    /// 按能力类型匹配（依赖字段）
    Capability,
    /// 按实现类型匹配（主组件等已知具体类型）
    Implementation,
}

impl LookupKey {
    /// 注册项是否与查找对象匹配（类型同一性）
    pub fn matches(self, registration: &Registration, subject: &TypeInfo) -> bool {
        match self {
            Self::Capability => registration.capability().id == subject.id,
            Self::Implementation => registration.implementation().id == subject.id,
        }
    }
}

/// 空标签替换为 `"default"`
pub fn effective_tag(requested: &str) -> &str {
    if requested.is_empty() {
        DEFAULT_TAG
    } else {
        requested
    }
}

/// 唯一匹配且无需标签消歧时直接返回
///
/// 按实现查找总是默认，按能力查找仅在未打标签时是默认。
fn sole_default(key: LookupKey, matches: &[Registration]) -> Option<&Registration> {
    match (key, matches) {
        (LookupKey::Implementation, [only]) => Some(only),
        (LookupKey::Capability, [only]) if only.tag().is_none() => Some(only),
        _ => None,
    }
}

/// 构建 标签 -> 注册项 映射
fn candidates_by_tag<'a>(
    subject: &TypeInfo,
    matches: &'a [Registration],
) -> DependencyResult<HashMap<&'a str, &'a Registration>> {
    let mut candidates = HashMap::with_capacity(matches.len());

    for candidate in matches {
        let tag = candidate
            .tag()
            .ok_or_else(|| DependencyError::AmbiguousImplementation {
                capability: subject.to_string(),
            })?;
        if candidates.insert(tag, candidate).is_some() {
            return Err(DependencyError::DuplicateTag {
                capability: subject.to_string(),
                tag: tag.to_string(),
            });
        }
    }

    Ok(candidates)
}

/// 从匹配的注册项中选出一个
///
/// `matches` 必须已经按 `key` 过滤。选择顺序：请求的标签，
/// 其次回退到 `"default"`，都不存在时报告未找到。
pub fn select_candidate(
    key: LookupKey,
    subject: &TypeInfo,
    matches: &[Registration],
    requested_tag: &str,
) -> DependencyResult<Registration> {
    let tag = effective_tag(requested_tag);
    if let Some(only) = sole_default(key, matches) {
        debug!(
            "选中 {} 的唯一实现 {} (tag={})",
            subject.short_name(),
            only.implementation().short_name(),
            tag
        );
        return Ok(only.clone());
    }

    let candidates = candidates_by_tag(subject, matches)?;

    if let Some(registration) = candidates.get(tag) {
        debug!(
            "选中 {} 的实现 {} (tag={})",
            subject.short_name(),
            registration.implementation().short_name(),
            tag
        );
        return Ok((*registration).clone());
    }

    let not_found = || DependencyError::ImplementationNotFound {
        capability: subject.to_string(),
    };
    if tag == DEFAULT_TAG {
        return Err(not_found());
    }

    let fallback = candidates.get(DEFAULT_TAG).ok_or_else(not_found)?;
    warn!(
        "{} 没有标签为 {} 的实现，回退到 {}",
        subject.short_name(),
        tag,
        fallback.implementation().short_name()
    );
    Ok((*fallback).clone())
}
