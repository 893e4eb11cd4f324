use scoped_di::{
    ComponentDescriptor, ConcurrentSingletonManager, Container, DiError, DiResult, Instance,
    InstanceManager, Key, Resolver, ScopeId, ScopeRegistry, SingletonManager,
    ThreadSingletonManager,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn counted(counter: &Arc<AtomicUsize>, scope: ScopeId) -> ComponentDescriptor {
    let counter = counter.clone();
    ComponentDescriptor::of(move |_| Ok(counter.fetch_add(1, Ordering::SeqCst))).in_scope(scope)
}

#[test]
fn test_scope_registry_set_has_get() {
    let mut registry = ScopeRegistry::new();
    registry.set(ScopeId::SINGLETON, SingletonManager::new());

    assert!(registry.has(&ScopeId::SINGLETON));
    assert!(registry.get(&ScopeId::SINGLETON).is_ok());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_scope_registry_unknown_scope() {
    let registry = ScopeRegistry::new();
    match registry.get(&ScopeId::new("request")) {
        Err(DiError::UnknownScope(scope)) => assert_eq!(scope.as_str(), "request"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("empty registry returned a manager"),
    }
}

#[test]
fn test_scope_registry_defaults() {
    let registry = ScopeRegistry::with_defaults();
    assert_eq!(
        registry.scopes(),
        vec![ScopeId::CONCURRENT, ScopeId::SINGLETON, ScopeId::THREAD]
    );
    assert!(!registry.has(&ScopeId::TRANSIENT));
}

#[test]
fn test_singleton_returns_same_instance() {
    let counter = Arc::new(AtomicUsize::new(0));
    let container = Container::new();
    container.register("s", counted(&counter, ScopeId::SINGLETON));

    let a = container.instance_for("s").unwrap();
    let b = container.instance_for("s").unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(container.scope_manager(&ScopeId::SINGLETON).unwrap().cached(), 1);
}

#[test]
fn test_transient_scope_never_caches() {
    let counter = Arc::new(AtomicUsize::new(0));
    let container = Container::new();
    container.register("t", counted(&counter, ScopeId::TRANSIENT));

    let a = container.get::<usize>("t").unwrap();
    let b = container.get::<usize>("t").unwrap();

    assert_eq!((*a, *b), (0, 1));
}

#[test]
fn test_unknown_scope_falls_back_to_transient() {
    let counter = Arc::new(AtomicUsize::new(0));
    let container = Container::new();
    container.register("r", counted(&counter, ScopeId::new("request")));

    let a = container.instance_for("r").unwrap();
    let b = container.instance_for("r").unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_custom_scope_manager() {
    let counter = Arc::new(AtomicUsize::new(0));
    let container = Container::new();
    container
        .set_scope(ScopeId::new("request"), SingletonManager::new())
        .register("r", counted(&counter, ScopeId::new("request")));

    let a = container.instance_for("r").unwrap();
    let b = container.instance_for("r").unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert!(container.has_scope(&ScopeId::new("request")));
}

#[test]
fn test_release_thread_drops_only_that_threads_instances() {
    let counter = Arc::new(AtomicUsize::new(0));
    let container = Container::new();
    container
        .register("t", counted(&counter, ScopeId::THREAD))
        .register("s", counted(&counter, ScopeId::SINGLETON));

    let mine = container.get::<usize>("t").unwrap();
    container.instance_for("s").unwrap();

    let worker = container.clone();
    let finished = thread::spawn(move || {
        worker.instance_for("t").unwrap();
        thread::current().id()
    })
    .join()
    .unwrap();

    let manager = container.scope_manager(&ScopeId::THREAD).unwrap();
    assert_eq!(manager.cached(), 2);

    assert_eq!(container.release_thread(finished), 1);
    assert_eq!(manager.cached(), 1);
    assert_eq!(container.scope_manager(&ScopeId::SINGLETON).unwrap().cached(), 1);

    // The calling thread keeps its instance until it releases it
    assert!(Arc::ptr_eq(&mine, &container.get::<usize>("t").unwrap()));
    assert_eq!(container.release_current_thread(), 1);
    assert_eq!(manager.cached(), 0);
    assert!(!Arc::ptr_eq(&mine, &container.get::<usize>("t").unwrap()));
}

#[test]
fn test_without_default_scopes_singleton_is_transient() {
    let counter = Arc::new(AtomicUsize::new(0));
    let container = Container::builder().without_default_scopes().build();
    container.register("s", counted(&counter, ScopeId::SINGLETON));

    container.instance_for("s").unwrap();
    container.instance_for("s").unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_failed_construction_is_not_cached() {
    let attempts = Arc::new(AtomicUsize::new(0));

    for scope in [ScopeId::SINGLETON, ScopeId::THREAD, ScopeId::CONCURRENT] {
        attempts.store(0, Ordering::SeqCst);
        let container = Container::new();
        let seen = attempts.clone();
        container.register(
            "flaky",
            ComponentDescriptor::of(move |_| {
                if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("first attempt fails".into())
                } else {
                    Ok(42u32)
                }
            })
            .in_scope(scope.clone()),
        );

        assert!(
            matches!(container.instance_for("flaky"), Err(DiError::Construction { .. })),
            "scope {}",
            scope
        );
        let a = container.get::<u32>("flaky").unwrap();
        let b = container.get::<u32>("flaky").unwrap();
        assert_eq!(*a, 42);
        assert!(Arc::ptr_eq(&a, &b), "scope {}", scope);
        assert_eq!(attempts.load(Ordering::SeqCst), 2, "scope {}", scope);
    }
}

#[test]
fn test_containers_do_not_share_caches() {
    let counter = Arc::new(AtomicUsize::new(0));
    let first = Container::new();
    let second = Container::new();
    first.register("s", counted(&counter, ScopeId::SINGLETON));
    second.register("s", counted(&counter, ScopeId::SINGLETON));

    let a = first.instance_for("s").unwrap();
    let b = second.instance_for("s").unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_per_thread_singleton() {
    let counter = Arc::new(AtomicUsize::new(0));
    let container = Container::new();
    container.register("p", counted(&counter, ScopeId::THREAD));

    let main_a = container.get::<usize>("p").unwrap();
    let main_b = container.get::<usize>("p").unwrap();
    assert!(Arc::ptr_eq(&main_a, &main_b));

    let worker = container.clone();
    let (other_a, other_b) = thread::spawn(move || {
        (worker.get::<usize>("p").unwrap(), worker.get::<usize>("p").unwrap())
    })
    .join()
    .unwrap();

    assert!(Arc::ptr_eq(&other_a, &other_b));
    assert!(!Arc::ptr_eq(&main_a, &other_a));
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(container.scope_manager(&ScopeId::THREAD).unwrap().cached(), 2);
}

#[test]
fn test_concurrency_singleton_depends_on_concurrency_singleton() {
    let container = Container::new();
    container
        .register("inner", ComponentDescriptor::of(|_| Ok(7u8)).in_scope(ScopeId::CONCURRENT))
        .register(
            "outer",
            ComponentDescriptor::of(|args| Ok(args.required::<u8>("inner")?))
                .depends_on("inner", "inner")
                .in_scope(ScopeId::CONCURRENT),
        );

    let outer = container.get::<Arc<u8>>("outer").unwrap();
    let inner = container.get::<u8>("inner").unwrap();
    assert!(Arc::ptr_eq(&*outer, &inner));
}

#[test]
fn test_manager_cache_is_per_key() {
    let manager = ConcurrentSingletonManager::new();
    let container = Container::new();
    container
        .register("a", ComponentDescriptor::of(|_| Ok(1u8)))
        .register("b", ComponentDescriptor::of(|_| Ok(2u8)));

    let a = manager.get_instance(&container, &Key::name("a")).unwrap();
    let b = manager.get_instance(&container, &Key::name("b")).unwrap();
    let again = manager.get_instance(&container, &Key::name("a")).unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &again));
    assert_eq!(manager.cached(), 2);
}

#[test]
fn test_thread_manager_unknown_key_not_cached() {
    let manager = ThreadSingletonManager::new();
    let container = Container::new();

    assert!(matches!(
        manager.get_instance(&container, &Key::name("nope")),
        Err(DiError::UnknownComponent(_))
    ));
    assert_eq!(manager.cached(), 0);
}

struct CountingManager {
    inner: SingletonManager,
    calls: AtomicUsize,
}

impl InstanceManager for CountingManager {
    fn get_instance(&self, container: &Container, key: &Key) -> DiResult<Instance> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_instance(container, key)
    }
}

#[test]
fn test_manager_consulted_on_every_resolution() {
    let manager = Arc::new(CountingManager {
        inner: SingletonManager::new(),
        calls: AtomicUsize::new(0),
    });

    let mut registry = ScopeRegistry::new();
    registry.set_shared(ScopeId::new("counted"), manager.clone());
    let container = Container::builder().scopes(registry).build();
    container.register("c", ComponentDescriptor::of(|_| Ok(1u8)).in_scope(ScopeId::new("counted")));

    for _ in 0..3 {
        container.instance_for("c").unwrap();
    }
    assert_eq!(manager.calls.load(Ordering::SeqCst), 3);
    assert_eq!(manager.inner.cached(), 1);
}
