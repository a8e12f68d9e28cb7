//! di-impl 单元测试


use crate::instantiator::Instantiator;
use crate::ledger::InitializedLedger;
use crate::registry::{global_registry, register, Registry};
use crate::runner::{resolve_main, run, run_async};
use di_abstractions::{
    ComponentRegistry, ComponentResolver, Registration, ResolveContext, ResolvedComponent,
};
use di_common::{DependencyError, DependencyResult, ResolverOptions, TypeInfo};
use fixtures::*;
use mockall::{mock, Sequence};
use std::any::Any;
use std::sync::Arc;

mock! {
    pub Resolver {}

    impl ComponentResolver for Resolver {
        fn resolve_by_capability(
            &self,
            capability: &TypeInfo,
            tag: &str,
            context: &mut ResolveContext,
        ) -> DependencyResult<ResolvedComponent>;

        fn resolve_by_implementation(
            &self,
            implementation: &TypeInfo,
            tag: &str,
            context: &mut ResolveContext,
        ) -> DependencyResult<ResolvedComponent>;
    }
}

fn resolved(registration: Registration) -> ResolvedComponent {
    let instance: Arc<dyn Any + Send + Sync> = Arc::from(registration.allocate().into_any());
    ResolvedComponent::new(registration, "default", instance)
}

fn fixture_registry() -> Registry {
    let registry = Registry::new();
    for registration in all_fixture_registrations() {
        registry.register(registration);
    }
    registry
}

#[derive(Debug)]
enum AppError {
    Dependency(DependencyError),
    Startup(String),
}

impl From<DependencyError> for AppError {
    fn from(e: DependencyError) -> Self {
        Self::Dependency(e)
    }
}

// ---- 实例化器 ----

#[test]
fn test_fills_references_in_declaration_order() {
    let mut resolver = MockResolver::new();
    let mut seq = Sequence::new();
    resolver
        .expect_resolve_by_capability()
        .withf(|capability, _, _| capability.is::<dyn Greeter>())
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(resolved(Registration::component::<EnglishGreeter>())));
    resolver
        .expect_resolve_by_capability()
        .withf(|capability, _, _| capability.is::<dyn Storage>())
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(resolved(Registration::component::<CloudStorage>())));

    let ledger = InitializedLedger::new();
    let component = Instantiator::new(&resolver, &ledger)
        .instantiate(
            &Registration::component::<DailyReporter>(),
            "default",
            &mut ResolveContext::default(),
        )
        .unwrap();

    let reporter = component.downcast::<DailyReporter>().unwrap();
    assert_eq!(reporter.report(), "hello ops @ cloud");
    assert_eq!(ledger.len(), 1);
}

#[test]
fn test_dependency_tag_is_propagated() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve_by_capability()
        .withf(|_, tag, _| tag.to_string() == "staging")
        .times(2)
        .returning(|capability, _, _| {
            if capability.is::<dyn Greeter>() {
                Ok(resolved(Registration::component::<EnglishGreeter>()))
            } else {
                Ok(resolved(Registration::component::<LocalStorage>()))
            }
        });

    let ledger = InitializedLedger::new();
    let component = Instantiator::new(&resolver, &ledger)
        .instantiate(
            &Registration::component::<DailyReporter>(),
            "staging",
            &mut ResolveContext::default(),
        )
        .unwrap();
    assert_eq!(component.tag(), "staging");
}

#[test]
fn test_field_error_names_owner_and_field() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve_by_capability()
        .times(1)
        .returning(|capability, _, _| {
            Err(DependencyError::ImplementationNotFound {
                capability: capability.to_string(),
            })
        });

    let ledger = InitializedLedger::new();
    let err = Instantiator::new(&resolver, &ledger)
        .instantiate(
            &Registration::component::<DailyReporter>(),
            "default",
            &mut ResolveContext::default(),
        )
        .unwrap_err();

    match &err {
        DependencyError::FieldResolution { owner, field, .. } => {
            assert_eq!(owner, "DailyReporter");
            assert_eq!(field, "greeter");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(err.root_cause(), DependencyError::ImplementationNotFound { .. }));
    assert!(ledger.is_empty());
}

#[test]
fn test_mismatched_handle_is_reported() {
    let mut resolver = MockResolver::new();
    resolver
        .expect_resolve_by_capability()
        .returning(|_, _, _| Ok(resolved(Registration::component::<LocalStorage>())));

    let ledger = InitializedLedger::new();
    let err = Instantiator::new(&resolver, &ledger)
        .instantiate(
            &Registration::component::<DailyReporter>(),
            "default",
            &mut ResolveContext::default(),
        )
        .unwrap_err();

    assert!(matches!(err.root_cause(), DependencyError::ReferenceTypeMismatch { .. }));
}

#[test]
fn test_logger_unsupported_names_type() {
    let resolver = MockResolver::new();
    let ledger = InitializedLedger::new();
    let err = Instantiator::new(&resolver, &ledger)
        .instantiate(
            &Registration::of::<dyn Greeter, Headless>(),
            "default",
            &mut ResolveContext::default(),
        )
        .unwrap_err();

    match err {
        DependencyError::LoggerUnsupported { type_name } => assert!(type_name.contains("Headless")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_context_is_unwound_after_failure() {
    let resolver = MockResolver::new();
    let ledger = InitializedLedger::new();
    let mut context = ResolveContext::default();

    let _ = Instantiator::new(&resolver, &ledger).instantiate(
        &Registration::of::<dyn Greeter, Headless>(),
        "default",
        &mut context,
    );
    assert_eq!(context.depth(), 0);
}

// ---- 注册表 ----

#[test]
fn test_resolve_two_dependencies() {
    let registry = fixture_registry();

    let reporter = registry.resolve::<dyn Reporter>("").unwrap();
    assert_eq!(reporter.report(), "hello ops @ local");

    let reporter = registry.resolve::<dyn Reporter>("cloud").unwrap();
    assert_eq!(reporter.report(), "hello ops @ cloud");

    let reporter = registry.resolve::<dyn Reporter>("staging").unwrap();
    assert_eq!(reporter.report(), "hello ops @ local");
}

#[test]
fn test_resolve_implementation() {
    let registry = fixture_registry();
    let reporter = registry.resolve_implementation::<DailyReporter>("edge").unwrap();

    assert_eq!(reporter.greeter.get().greet("x"), "hello x");
    assert_eq!(reporter.storage.get().location(), "edge");
}

#[test]
fn test_resolutions_are_fresh() {
    let registry = fixture_registry();

    let first = registry.resolve_implementation::<DailyReporter>("").unwrap();
    let second = registry.resolve_implementation::<DailyReporter>("").unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(
        first.greeter.try_get().unwrap(),
        second.greeter.try_get().unwrap()
    ));

    let fingerprint = Registration::component::<DailyReporter>().fingerprint();
    let entry = registry
        .initialized()
        .into_iter()
        .find(|entry| entry.fingerprint == fingerprint)
        .unwrap();
    assert_eq!(entry.instances_created, 2);
    assert!(entry.implementation.is::<DailyReporter>());
}

#[test]
fn test_register_is_append_only() {
    let registry = Registry::new();
    registry.register_component::<EnglishGreeter>();
    assert!(registry.resolve::<dyn Greeter>("").is_ok());

    registry.register_component::<EnglishGreeter>();
    assert_eq!(registry.len(), 2);
    assert!(matches!(
        registry.resolve::<dyn Greeter>(""),
        Err(DependencyError::AmbiguousImplementation { .. })
    ));
}

#[test]
fn test_implementation_registered_twice() {
    let registry = Registry::new();
    registry.register_component::<EnglishGreeter>();
    registry.register_component::<EnglishGreeter>();

    let err = registry
        .resolve_implementation::<EnglishGreeter>("")
        .err()
        .expect("解析应当失败");
    assert!(matches!(err, DependencyError::AmbiguousImplementation { .. }));

    let registry = Registry::new();
    registry.register_component::<CloudStorage>();
    registry.register_component::<CloudStorage>();

    let err = registry
        .resolve_implementation::<CloudStorage>("cloud")
        .err()
        .expect("解析应当失败");
    match err {
        DependencyError::DuplicateTag { tag, .. } => assert_eq!(tag, "cloud"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_depth_of_one_only_builds_leaves() {
    let registry = Registry::with_options(ResolverOptions {
        max_depth: 1,
        ..ResolverOptions::default()
    });
    for registration in all_fixture_registrations() {
        registry.register(registration);
    }

    assert!(registry.resolve::<dyn Storage>("cloud").is_ok());
    let err = registry
        .resolve::<dyn Reporter>("")
        .err()
        .expect("解析应当失败");
    assert!(matches!(
        err.root_cause(),
        DependencyError::MaxDepthExceeded { max_depth: 1, .. }
    ));
}

#[test]
fn test_duplicate_tag_surfaces_through_field() {
    let registry = fixture_registry();
    registry.register_component::<OtherCloudStorage>();

    let err = registry
        .resolve::<dyn Reporter>("cloud")
        .err()
        .expect("解析应当失败");
    assert!(matches!(err.root_cause(), DependencyError::DuplicateTag { .. }));
}

#[test]
fn test_missing_capability() {
    let registry = Registry::new();
    assert!(registry.is_empty());

    let err = registry
        .resolve::<dyn Storage>("")
        .err()
        .expect("解析应当失败");
    assert!(err.to_string().contains("Storage"));
}

#[test]
fn test_registry_trait_view() {
    let registry = fixture_registry();
    let view: &dyn ComponentRegistry = &registry;

    assert!(view.is_registered(&TypeInfo::of::<dyn Storage>()));
    assert!(!view.is_registered(&TypeInfo::of::<dyn Ping>()));
    assert_eq!(view.registrations().len(), all_fixture_registrations().len());
}

#[test]
fn test_cycle_is_reported() {
    let registry = Registry::new();
    registry.register_component::<PingService>();
    registry.register_component::<PongService>();

    let err = registry
        .resolve::<dyn Ping>("")
        .err()
        .expect("解析应当失败");
    match err.root_cause() {
        DependencyError::CircularDependency { dependency_chain } => {
            assert_eq!(dependency_chain, "PingService -> PongService -> PingService");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_max_depth_without_cycle_detection() {
    let registry = Registry::with_options(ResolverOptions {
        detect_cycles: false,
        max_depth: 8,
        log_instantiation: true,
    });
    registry.register_component::<PingService>();
    registry.register_component::<PongService>();

    let err = registry
        .resolve::<dyn Pong>("")
        .err()
        .expect("解析应当失败");
    assert!(matches!(
        err.root_cause(),
        DependencyError::MaxDepthExceeded { max_depth: 8, .. }
    ));
}

#[test]
fn test_concurrent_resolutions() {
    let registry = fixture_registry();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| registry.resolve::<dyn Reporter>("cloud").map(|r| r.report())))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), "hello ops @ cloud");
        }
    });

    let fingerprint = Registration::component::<CloudStorage>().fingerprint();
    let entry = registry
        .initialized()
        .into_iter()
        .find(|entry| entry.fingerprint == fingerprint)
        .unwrap();
    assert_eq!(entry.instances_created, 4);
}

#[test]
fn test_global_registry() {
    let before = global_registry().len();
    register(Registration::component::<GermanGreeter>());

    assert!(global_registry().len() > before);
    assert!(global_registry().is_registered(&TypeInfo::of::<dyn Greeter>()));
}

// ---- 校验 ----

#[test]
fn test_validate_complete_registry() {
    assert!(fixture_registry().validate().is_ok());
}

#[test]
fn test_validate_reports_all_problems() {
    let registry = Registry::new();
    registry.register_component::<DailyReporter>();
    registry.register_component::<PingService>();
    registry.register_component::<PongService>();
    registry.register(Registration::of::<dyn Greeter, Headless>());
    registry.register_component::<EnglishGreeter>();

    let errors = registry.validate().unwrap_err();

    assert!(errors.iter().any(|e| matches!(
        e,
        DependencyError::FieldResolution { field, .. } if field == "greeter"
    )));
    assert!(errors.iter().any(|e| matches!(
        e,
        DependencyError::FieldResolution { field, .. } if field == "storage"
    )));
    assert!(errors
        .iter()
        .any(|e| matches!(e, DependencyError::LoggerUnsupported { .. })));
    assert!(errors.iter().any(|e| matches!(
        e,
        DependencyError::CircularDependency { dependency_chain }
            if dependency_chain == "PingService -> PongService -> PingService"
    )));
}

// ---- 入口 ----

#[test]
fn test_run_resolves_main_with_default_tag() {
    let registry = fixture_registry();

    let mut report = String::new();
    run::<ReportingApp, DependencyError, _>(&registry, |app| {
        report = app.reporter.get().report();
        Ok(())
    })
    .unwrap();

    assert_eq!(report, "hello ops @ local");
}

#[test]
fn test_run_returns_resolution_error_unmodified() {
    let registry = Registry::new();
    let mut called = false;

    let err = run::<ReportingApp, AppError, _>(&registry, |_| {
        called = true;
        Ok(())
    })
    .unwrap_err();

    assert!(!called);
    assert!(matches!(
        err,
        AppError::Dependency(DependencyError::ImplementationNotFound { .. })
    ));
}

#[test]
fn test_run_returns_startup_error_unmodified() {
    let registry = fixture_registry();

    let err = run::<ReportingApp, AppError, _>(&registry, |_| Err(AppError::Startup("boom".into())))
        .unwrap_err();

    match err {
        AppError::Startup(message) => assert_eq!(message, "boom"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_resolve_main() {
    let registry = fixture_registry();
    let app = resolve_main::<ReportingApp>(&registry).unwrap();
    assert!(app.reporter.try_get().is_some());
}

#[tokio::test]
async fn test_run_async() {
    let registry = fixture_registry();

    let report = Arc::new(parking_lot::Mutex::new(String::new()));
    let sink = Arc::clone(&report);
    run_async::<ReportingApp, DependencyError, _, _>(&registry, |app| async move {
        tokio::task::yield_now().await;
        *sink.lock() = app.reporter.get().report();
        Ok(())
    })
    .await
    .unwrap();

    assert_eq!(report.lock().as_str(), "hello ops @ local");
}
