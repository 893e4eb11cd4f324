use scoped_di::{ComponentDescriptor, Container, DiError, Key, Resolver, ScopeId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct DbKey;

#[derive(Debug)]
struct Db {
    dialect: &'static str,
}

#[derive(Debug)]
struct Dao {
    db: Option<Arc<Db>>,
}

fn db_descriptor() -> ComponentDescriptor {
    ComponentDescriptor::of(|_| Ok(Db { dialect: "pgsql" })).in_scope(ScopeId::SINGLETON)
}

fn dao_descriptor() -> ComponentDescriptor {
    ComponentDescriptor::of(|args| Ok(Dao { db: args.optional("db")? }))
        .depends_on("db", Key::of::<DbKey>())
}

#[test]
fn test_transient_is_new_every_time() {
    let container = Container::new();
    container.register("n", ComponentDescriptor::of(|_| Ok(String::from("x"))));

    let a = container.get::<String>("n").unwrap();
    let b = container.get::<String>("n").unwrap();

    assert_eq!(*a, "x");
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_dependency_injected_into_constructor() {
    let container = Container::new();
    container
        .register("Dao", dao_descriptor())
        .register(Key::of::<DbKey>(), db_descriptor());

    let db = container.get::<Db>(Key::of::<DbKey>()).unwrap();
    let dao = container.get::<Dao>("Dao").unwrap();

    assert!(Arc::ptr_eq(dao.db.as_ref().unwrap(), &db));
    assert_eq!(dao.db.as_ref().unwrap().dialect, "pgsql");
}

#[test]
fn test_absent_dependency_alias_uses_constructor_default() {
    let container = Container::new();
    container.register("Dao", ComponentDescriptor::of(|args| Ok(Dao { db: args.optional("db")? })));

    let dao = container.get::<Dao>("Dao").unwrap();
    assert!(dao.db.is_none());
}

#[test]
fn test_unknown_component() {
    let container = Container::new();

    match container.instance_for("Missing") {
        Err(DiError::UnknownComponent(key)) => assert_eq!(key, Key::name("Missing")),
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unknown_dependency_fails_at_resolution_not_registration() {
    let container = Container::new();
    container.register("Dao", dao_descriptor());
    assert!(container.contains("Dao"));

    match container.instance_for("Dao") {
        Err(DiError::UnknownComponent(key)) => assert_eq!(key, Key::of::<DbKey>()),
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_registration_replaces_wholesale() {
    let container = Container::new();
    container.register("v", ComponentDescriptor::of(|_| Ok(1u32)).in_scope(ScopeId::SINGLETON));
    container.register("v", ComponentDescriptor::of(|_| Ok(2u32)));

    assert_eq!(container.len(), 1);
    assert_eq!(container.descriptor(&Key::name("v")).unwrap().scope(), &ScopeId::TRANSIENT);
    assert_eq!(*container.get::<u32>("v").unwrap(), 2);
}

#[test]
fn test_unregister() {
    let container = Container::new();
    container.register("v", ComponentDescriptor::of(|_| Ok(1u32)));

    assert!(container.unregister("v"));
    assert!(!container.unregister("v"));
    assert!(container.is_empty());
    assert!(matches!(container.instance_for("v"), Err(DiError::UnknownComponent(_))));
}

#[test]
fn test_name_and_marker_keys_do_not_collide() {
    struct Dao;

    let container = Container::new();
    container
        .register(Key::name(std::any::type_name::<Dao>()), ComponentDescriptor::of(|_| Ok(1u8)))
        .register(Key::of::<Dao>(), ComponentDescriptor::of(|_| Ok(2u8)));

    assert_eq!(container.len(), 2);
    assert_eq!(*container.get::<u8>(std::any::type_name::<Dao>()).unwrap(), 1);
    assert_eq!(*container.get::<u8>(Key::of::<Dao>()).unwrap(), 2);
}

#[test]
fn test_type_mismatch_on_typed_get() {
    let container = Container::new();
    container.register("n", ComponentDescriptor::of(|_| Ok(1u8)));

    match container.get::<String>("n") {
        Err(DiError::TypeMismatch { name, .. }) => assert_eq!(name, "n"),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_try_get_distinguishes_missing_root_from_missing_dependency() {
    let container = Container::new();
    container.register("Dao", dao_descriptor());

    assert!(container.try_get::<Dao>("Nothing").unwrap().is_none());
    assert!(container.try_get::<Dao>("Dao").is_err());
}

#[test]
fn test_construction_error_carries_key() {
    let container = Container::new();
    container
        .register("broken", ComponentDescriptor::of(|_| -> Result<u8, scoped_di::BoxError> { Err("no disk".into()) }))
        .register("user", ComponentDescriptor::of(|args| Ok(args.required::<u8>("b")?)).depends_on("b", "broken"));

    match container.instance_for("user") {
        Err(err @ DiError::Construction { .. }) => {
            assert!(err.to_string().contains("'broken'"));
            assert!(err.to_string().contains("no disk"));
            assert!(std::error::Error::source(&err).is_some());
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_singleton_dependencies_resolved_once() {
    static DB_BUILT: AtomicUsize = AtomicUsize::new(0);

    let container = Container::new();
    container
        .register(
            Key::of::<DbKey>(),
            ComponentDescriptor::of(|_| {
                DB_BUILT.fetch_add(1, Ordering::SeqCst);
                Ok(Db { dialect: "pgsql" })
            }),
        )
        .register("Dao", dao_descriptor().in_scope(ScopeId::SINGLETON));

    for _ in 0..5 {
        container.instance_for("Dao").unwrap();
    }
    // Db is transient, but a cached Dao never re-resolves it
    assert_eq!(DB_BUILT.load(Ordering::SeqCst), 1);
}

#[test]
fn test_self_dependency_hits_depth_limit() {
    let container = Container::new();
    container.register(
        "loop",
        ComponentDescriptor::of(|args| Ok(args.len())).depends_on("me", "loop"),
    );

    assert!(matches!(container.instance_for("loop"), Err(DiError::DepthExceeded(_))));
    // The depth counter is balanced afterwards
    container.register("ok", ComponentDescriptor::of(|_| Ok(1u8)));
    assert!(container.instance_for("ok").is_ok());
}

#[test]
fn test_components_snapshot_sorted() {
    let container = Container::new();
    container
        .register("b", ComponentDescriptor::of(|_| Ok(1u8)).depends_on("a", "a"))
        .register("a", ComponentDescriptor::of(|_| Ok(1u8)).in_scope(ScopeId::SINGLETON));

    let infos = container.components();
    assert_eq!(infos.len(), 2);
    assert_eq!(infos[0].key, Key::name("a"));
    assert_eq!(infos[0].scope, ScopeId::SINGLETON);
    assert_eq!(infos[1].dependencies.get("a"), Some(&Key::name("a")));
    assert!(infos[1].type_name.ends_with("u8"));
}

#[test]
fn test_clones_share_state() {
    let container = Container::new();
    let clone = container.clone();
    clone.register("s", ComponentDescriptor::of(|_| Ok(5u8)).in_scope(ScopeId::SINGLETON));

    assert!(container.ptr_eq(&clone));
    let a = container.instance_for("s").unwrap();
    let b = clone.instance_for("s").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}
