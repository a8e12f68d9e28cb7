//! 注册表静态校验
//!
//! 不实例化任何组件：只分配零值实例读取引用字段，
//! 按 `"default"` 标签模拟候选选择，并在得到的依赖图上做深度优先的环检测。

use crate::registry::Registry;
use crate::resolver::{select_candidate, LookupKey};
use di_abstractions::Registration;
use di_common::{DependencyError, TypeInfo, DEFAULT_TAG};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// 依赖图节点
struct Node {
    implementation: TypeInfo,
    dependencies: Vec<TypeId>,
}

impl Registry {
    /// 校验所有注册项在默认标签下都能完成装配
    ///
    /// 返回全部发现的问题：缺失或有歧义的依赖、不支持日志挂载的实现、循环依赖。
    pub fn validate(&self) -> Result<(), Vec<DependencyError>> {
        let registrations = self.registrations();
        let mut errors = Vec::new();
        let mut graph: HashMap<TypeId, Node> = HashMap::new();
        let mut order = Vec::new();

        for registration in &registrations {
            let implementation = registration.implementation().clone();
            let dependencies = dependencies_of(registration, &registrations, &mut errors);

            let node = graph.entry(implementation.id).or_insert_with(|| {
                order.push(implementation.id);
                Node {
                    implementation,
                    dependencies: Vec::new(),
                }
            });
            for dependency in dependencies {
                if !node.dependencies.contains(&dependency) {
                    node.dependencies.push(dependency);
                }
            }
        }

        let mut visited = HashSet::new();
        let mut path = Vec::new();
        for id in &order {
            if !visited.contains(id) {
                detect_cycles(*id, &graph, &mut visited, &mut path, &mut errors);
            }
        }

        if errors.is_empty() {
            debug!("注册表校验通过: {} 个注册项", registrations.len());
            Ok(())
        } else {
            warn!("注册表校验发现 {} 个问题", errors.len());
            Err(errors)
        }
    }
}

/// 收集一个注册项在默认标签下选中的依赖实现
fn dependencies_of(
    registration: &Registration,
    registrations: &[Registration],
    errors: &mut Vec<DependencyError>,
) -> Vec<TypeId> {
    let owner = registration.implementation().short_name();
    let mut instance = registration.allocate();

    if instance.logger_slot().is_none() {
        errors.push(DependencyError::LoggerUnsupported {
            type_name: registration.implementation().to_string(),
        });
    }

    let fields: Vec<(&'static str, TypeInfo)> = instance
        .references()
        .iter()
        .map(|field| (field.name, field.reference.target()))
        .collect();

    let mut dependencies = Vec::with_capacity(fields.len());
    for (field, target) in fields {
        let matches: Vec<Registration> = registrations
            .iter()
            .filter(|candidate| LookupKey::Capability.matches(candidate, &target))
            .cloned()
            .collect();

        match select_candidate(LookupKey::Capability, &target, &matches, DEFAULT_TAG) {
            Ok(selected) => dependencies.push(selected.implementation().id),
            Err(e) => errors.push(e.in_field(owner, field)),
        }
    }
    dependencies
}

/// 深度优先遍历，`path` 同时充当当前递归栈
fn detect_cycles(
    current: TypeId,
    graph: &HashMap<TypeId, Node>,
    visited: &mut HashSet<TypeId>,
    path: &mut Vec<TypeId>,
    errors: &mut Vec<DependencyError>,
) {
    if let Some(start) = path.iter().position(|id| *id == current) {
        let chain = path[start..]
            .iter()
            .chain(std::iter::once(&current))
            .filter_map(|id| graph.get(id))
            .map(|node| node.implementation.short_name().to_string())
            .collect::<Vec<_>>()
            .join(" -> ");
        errors.push(DependencyError::CircularDependency {
            dependency_chain: chain,
        });
        return;
    }

    if !visited.insert(current) {
        return;
    }

    let Some(node) = graph.get(&current) else {
        return;
    };

    path.push(current);
    for dependency in &node.dependencies {
        detect_cycles(*dependency, graph, visited, path, errors);
    }
    path.pop();
}
