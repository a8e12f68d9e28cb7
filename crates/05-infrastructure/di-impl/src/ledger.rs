//! 已初始化实例台账
//!
//! 按注册项指纹记录最近一次构造的实例。台账只写不读：
//! 解析路径从不查询它，每次解析都会构造新实例。

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use di_abstractions::ResolvedComponent;
use di_common::TypeInfo;
use std::any::Any;
use std::sync::Arc;
use uuid::Uuid;

/// 台账条目
#[derive(Debug, Clone)]
pub struct InitializedComponent {
    /// 注册项指纹
    pub fingerprint: Uuid,
    /// 能力类型
    pub capability: TypeInfo,
    /// 实现类型
    pub implementation: TypeInfo,
    /// 最近一次构造使用的标签
    pub tag: String,
    /// 最近一次构造的实例
    pub instance: Arc<dyn Any + Send + Sync>,
    /// 累计构造次数
    pub instances_created: u64,
    /// 最近一次构造时间
    pub last_initialized_at: DateTime<Utc>,
}

/// 已初始化实例台账
#[derive(Debug, Default)]
pub struct InitializedLedger {
    entries: DashMap<Uuid, InitializedComponent>,
}

impl InitializedLedger {
    /// 创建空台账
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次构造
    pub fn record(&self, component: &ResolvedComponent) {
        let registration = component.registration();
        let fingerprint = registration.fingerprint();
        let now = Utc::now();

        self.entries
            .entry(fingerprint)
            .and_modify(|entry| {
                entry.tag = component.tag().to_string();
                entry.instance = Arc::clone(component.instance());
                entry.instances_created += 1;
                entry.last_initialized_at = now;
            })
            .or_insert_with(|| InitializedComponent {
                fingerprint,
                capability: registration.capability().clone(),
                implementation: registration.implementation().clone(),
                tag: component.tag().to_string(),
                instance: Arc::clone(component.instance()),
                instances_created: 1,
                last_initialized_at: now,
            });
    }

    /// 所有条目的快照
    pub fn snapshot(&self) -> Vec<InitializedComponent> {
        self.entries.iter().map(|entry| entry.value().clone()).collect()
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
