use scoped_di::{
    BoxError, ComponentDescriptor, Container, DiError, Factory, Key, Resolver, ScopeId, Source,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static FACTORIES_BUILT: AtomicUsize = AtomicUsize::new(0);

struct Connection {
    id: usize,
}

struct ConnectionFactory {
    calls: AtomicUsize,
    fail: bool,
}

impl ConnectionFactory {
    fn new(fail: bool) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail,
        }
    }
}

impl Factory for ConnectionFactory {
    type Product = Connection;

    fn get_instance(&self) -> Result<Arc<Connection>, BoxError> {
        if self.fail {
            return Err("connection refused".into());
        }
        let id = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(Connection { id }))
    }
}

#[test]
fn test_resolution_returns_product_not_factory() {
    let container = Container::new();
    container.register("conn", ComponentDescriptor::factory(|_| Ok(ConnectionFactory::new(false))));

    assert!(container.get::<Connection>("conn").is_ok());
    assert!(matches!(
        container.get::<ConnectionFactory>("conn"),
        Err(DiError::TypeMismatch { .. })
    ));
}

#[test]
fn test_cached_factory_accessor_runs_every_time() {
    let container = Container::new();
    container.register(
        "conn",
        ComponentDescriptor::factory(|_| {
            FACTORIES_BUILT.fetch_add(1, Ordering::SeqCst);
            Ok(ConnectionFactory::new(false))
        })
        .in_scope(ScopeId::SINGLETON),
    );

    let a = container.get::<Connection>("conn").unwrap();
    let b = container.get::<Connection>("conn").unwrap();

    // One factory, two products
    assert_eq!(FACTORIES_BUILT.load(Ordering::SeqCst), 1);
    assert_eq!((a.id, b.id), (0, 1));
}

#[test]
fn test_transient_factory_rebuilt_every_time() {
    let container = Container::new();
    container.register("conn", ComponentDescriptor::factory(|_| Ok(ConnectionFactory::new(false))));

    let a = container.get::<Connection>("conn").unwrap();
    let b = container.get::<Connection>("conn").unwrap();
    assert_eq!((a.id, b.id), (0, 0));
}

#[test]
fn test_factory_dependencies_injected() {
    struct Pool {
        size: Arc<usize>,
    }

    struct PoolFactory {
        size: Arc<usize>,
    }

    impl Factory for PoolFactory {
        type Product = Pool;

        fn get_instance(&self) -> Result<Arc<Pool>, BoxError> {
            Ok(Arc::new(Pool { size: self.size.clone() }))
        }
    }

    let container = Container::new();
    container
        .register("size", ComponentDescriptor::of(|_| Ok(8usize)))
        .register(
            "pool",
            ComponentDescriptor::factory(|args| Ok(PoolFactory { size: args.required("size")? }))
                .depends_on("size", "size"),
        );

    assert_eq!(*container.get::<Pool>("pool").unwrap().size, 8);
}

#[test]
fn test_accessor_failure_is_construction_error() {
    let container = Container::new();
    container.register("conn", ComponentDescriptor::factory(|_| Ok(ConnectionFactory::new(true))));

    match container.instance_for("conn") {
        Err(DiError::Construction { key, source }) => {
            assert_eq!(key, Key::name("conn"));
            assert_eq!(source.to_string(), "connection refused");
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_factory_flag_on_plain_source() {
    let container = Container::new();
    container.register("odd", ComponentDescriptor::new(Source::new(|_| Ok(1u8)), true));

    match container.instance_for("odd") {
        Err(DiError::NotAFactory(key)) => assert_eq!(key, Key::name("odd")),
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_factory_info_reports_factory_type() {
    let container = Container::new();
    container.register("conn", ComponentDescriptor::factory(|_| Ok(ConnectionFactory::new(false))));

    let info = &container.components()[0];
    assert!(info.is_factory);
    assert!(info.type_name.ends_with("ConnectionFactory"));
}
