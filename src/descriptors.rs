//! Component and injectable-method descriptors.
//!
//! Descriptors are the plain configuration records produced by a declarative
//! layer and consumed by the [`Container`](crate::Container). The container
//! never inspects source-level declarations itself.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::args::{Args, Instance};
use crate::binding::{Injectable, MethodTable};
use crate::error::BoxError;
use crate::key::Key;
use crate::scope::ScopeId;

/// Reserved injectable-method name run once right after construction.
pub const POST_INIT: &str = "post_init";

type Ctor = Arc<dyn Fn(&Args) -> Result<Instance, BoxError> + Send + Sync>;

/// A component whose constructed object is only an intermediary.
///
/// When a descriptor is factory-flagged the container constructs the factory
/// (resolving and caching it like any other component) and then calls
/// [`get_instance`](Factory::get_instance) to obtain the instance handed to
/// the caller.
///
/// The accessor runs on every resolution. Under a caching scope the same
/// factory object is reused, so the "one instance" guarantee of that scope
/// only carries over to the product if the accessor is idempotent, e.g. by
/// returning a clone of an `Arc` it already holds.
///
/// # Examples
///
/// ```rust
/// use scoped_di::{Container, ComponentDescriptor, Factory, BoxError, Resolver};
/// use std::sync::Arc;
///
/// struct Dao { table: &'static str }
///
/// struct DaoFactory;
///
/// impl Factory for DaoFactory {
///     type Product = Dao;
///
///     fn get_instance(&self) -> Result<Arc<Dao>, BoxError> {
///         Ok(Arc::new(Dao { table: "users" }))
///     }
/// }
///
/// let container = Container::new();
/// container.register("Dao", ComponentDescriptor::factory(|_| Ok(DaoFactory)));
///
/// let dao = container.get::<Dao>("Dao").unwrap();
/// assert_eq!(dao.table, "users");
/// ```
pub trait Factory: Send + Sync + 'static {
    /// Type of the real instance.
    type Product: Any + Send + Sync;

    /// Produces the real instance.
    fn get_instance(&self) -> Result<Arc<Self::Product>, BoxError>;
}

trait ErasedFactory: Send + Sync {
    fn produce(&self) -> Result<Instance, BoxError>;
}

impl<F: Factory> ErasedFactory for F {
    fn produce(&self) -> Result<Instance, BoxError> {
        self.get_instance().map(|product| product as Instance)
    }
}

/// Factory object as stored in scope caches.
pub(crate) struct FactoryObject {
    inner: Box<dyn ErasedFactory>,
}

impl FactoryObject {
    pub(crate) fn produce(&self) -> Result<Instance, BoxError> {
        self.inner.produce()
    }
}

/// Constructor reference for a component.
///
/// Wraps a closure taking the named [`Args`] bundle, plus the identity of the
/// type it builds for diagnostics.
#[derive(Clone)]
pub struct Source {
    ctor: Ctor,
    built_type: TypeId,
    type_name: &'static str,
}

impl Source {
    /// Source for a plain constructible type.
    pub fn new<T, F>(ctor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Args) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            ctor: Arc::new(move |args| ctor(args).map(|value| Arc::new(value) as Instance)),
            built_type: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Source for a factory type; the built object exposes the factory accessor.
    pub fn factory<F, C>(ctor: C) -> Self
    where
        F: Factory,
        C: Fn(&Args) -> Result<F, BoxError> + Send + Sync + 'static,
    {
        Self {
            ctor: Arc::new(move |args| {
                let factory = ctor(args)?;
                Ok(Arc::new(FactoryObject { inner: Box::new(factory) }) as Instance)
            }),
            built_type: TypeId::of::<F>(),
            type_name: std::any::type_name::<F>(),
        }
    }

    /// Invokes the constructor with already resolved arguments.
    pub fn construct(&self, args: &Args) -> Result<Instance, BoxError> {
        (self.ctor)(args)
    }

    /// TypeId of the constructed type (the factory type for factory sources).
    pub fn built_type(&self) -> TypeId {
        self.built_type
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").field("type_name", &self.type_name).finish()
    }
}

/// Immutable description of how to build one component.
///
/// Holds the constructor [`Source`], the dependency aliases (constructor
/// parameter name → component key), the scope id and the factory flag.
/// Registering another descriptor under the same key replaces it wholesale.
///
/// # Examples
///
/// ```rust
/// use scoped_di::{ComponentDescriptor, Key, ScopeId};
/// use std::sync::Arc;
///
/// struct DbKey;
/// struct Db;
/// struct Dao { db: Option<Arc<Db>> }
///
/// let descriptor = ComponentDescriptor::of(|args| Ok(Dao { db: args.optional("db")? }))
///     .depends_on("db", Key::of::<DbKey>())
///     .in_scope(ScopeId::SINGLETON);
///
/// assert_eq!(descriptor.scope(), &ScopeId::SINGLETON);
/// assert_eq!(descriptor.dependencies().get("db"), Some(&Key::of::<DbKey>()));
/// assert!(!descriptor.is_factory());
/// ```
#[derive(Clone)]
pub struct ComponentDescriptor {
    source: Source,
    dependencies: BTreeMap<String, Key>,
    scope: ScopeId,
    is_factory: bool,
    methods: Option<Arc<MethodTable>>,
}

impl ComponentDescriptor {
    /// Descriptor from an explicit source and factory flag.
    pub fn new(source: Source, is_factory: bool) -> Self {
        Self {
            source,
            dependencies: BTreeMap::new(),
            scope: ScopeId::TRANSIENT,
            is_factory,
            methods: None,
        }
    }

    /// Plain component built by `ctor`.
    pub fn of<T, F>(ctor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Args) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self::new(Source::new(ctor), false)
    }

    /// Factory component; resolution yields the factory's product.
    pub fn factory<F, C>(ctor: C) -> Self
    where
        F: Factory,
        C: Fn(&Args) -> Result<F, BoxError> + Send + Sync + 'static,
    {
        Self::new(Source::factory(ctor), true)
    }

    /// Plain component whose type declares injectable methods.
    ///
    /// Registering the descriptor also registers `T`'s method table, so the
    /// container binds itself to new instances and runs `post_init`.
    pub fn injectable<T, F>(ctor: F) -> Self
    where
        T: Injectable,
        F: Fn(&Args) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let mut descriptor = Self::of(ctor);
        descriptor.methods = Some(Arc::new(MethodTable::of::<T>()));
        descriptor
    }

    /// Factory component whose product declares injectable methods.
    pub fn injectable_factory<F, C>(ctor: C) -> Self
    where
        F: Factory,
        F::Product: Injectable,
        C: Fn(&Args) -> Result<F, BoxError> + Send + Sync + 'static,
    {
        let mut descriptor = Self::factory(ctor);
        descriptor.methods = Some(Arc::new(MethodTable::of::<F::Product>()));
        descriptor
    }

    /// Adds a dependency alias: constructor parameter `param` receives the
    /// instance resolved for `key`.
    pub fn depends_on(mut self, param: impl Into<String>, key: impl Into<Key>) -> Self {
        self.dependencies.insert(param.into(), key.into());
        self
    }

    /// Sets the scope id.
    pub fn in_scope(mut self, scope: impl Into<ScopeId>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Dependency aliases, parameter name → component key.
    pub fn dependencies(&self) -> &BTreeMap<String, Key> {
        &self.dependencies
    }

    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    pub fn is_factory(&self) -> bool {
        self.is_factory
    }

    pub(crate) fn method_table(&self) -> Option<&Arc<MethodTable>> {
        self.methods.as_ref()
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("source", &self.source)
            .field("dependencies", &self.dependencies)
            .field("scope", &self.scope)
            .field("is_factory", &self.is_factory)
            .finish()
    }
}

/// Declares one injectable method of a type.
///
/// The dependency aliases map the method's parameter names to component
/// keys; parameters the caller omits are resolved against the container the
/// instance is bound to. The name [`POST_INIT`] is reserved for the hook the
/// container runs right after construction.
///
/// # Examples
///
/// ```rust
/// use scoped_di::{MethodDescriptor, Key};
///
/// let hook = MethodDescriptor::post_init().depends_on("model", "Dao");
/// assert!(hook.is_post_init());
/// assert_eq!(hook.dependencies().get("model"), Some(&Key::name("Dao")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    dependencies: BTreeMap<String, Key>,
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dependencies: BTreeMap::new(),
        }
    }

    /// Descriptor for the reserved post-construction hook.
    pub fn post_init() -> Self {
        Self::new(POST_INIT)
    }

    pub fn depends_on(mut self, param: impl Into<String>, key: impl Into<Key>) -> Self {
        self.dependencies.insert(param.into(), key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &BTreeMap<String, Key> {
        &self.dependencies
    }

    pub fn is_post_init(&self) -> bool {
        self.name == POST_INIT
    }
}

/// Registered component snapshot for introspection and diagnostics
///
/// Produced by [`Container::components`](crate::Container::components).
///
/// # Use Cases
///
/// - **Debugging**: inspect which components are registered and in which scope
/// - **Validation**: check that every dependency alias points at a registered key
/// - **Documentation**: export the dependency graph
#[derive(Debug, Clone)]
pub struct ComponentInfo {
    /// Component key
    pub key: Key,
    /// Constructed type name (the factory type for factory components)
    pub type_name: &'static str,
    /// Scope id
    pub scope: ScopeId,
    /// Whether resolution goes through a factory accessor
    pub is_factory: bool,
    /// Dependency aliases, parameter name → component key
    pub dependencies: BTreeMap<String, Key>,
}

impl ComponentInfo {
    pub(crate) fn new(key: &Key, descriptor: &ComponentDescriptor) -> Self {
        Self {
            key: key.clone(),
            type_name: descriptor.source().type_name(),
            scope: descriptor.scope().clone(),
            is_factory: descriptor.is_factory(),
            dependencies: descriptor.dependencies().clone(),
        }
    }
}
