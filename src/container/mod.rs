//! The container: component registry, scope registry and resolution.
//!
//! Resolution of a key K runs depth-first:
//!
//! 1. fetch K's descriptor (`UnknownComponent` if absent)
//! 2. pick the instance manager for the descriptor's scope; without one the
//!    component is transient
//! 3. on a cache miss the manager calls [`Container::construct`], which
//!    resolves every dependency alias recursively, runs the instance
//!    creator, binds the container to the new instance and runs `post_init`
//! 4. for factory components, call the factory accessor on the (possibly
//!    cached) factory object and initialize the product the same way

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::{Arc, Weak};
use std::thread::{self, ThreadId};
use std::time::Instant;

use crate::args::{Args, Instance};
use crate::binding::{Injectable, MethodTable};
use crate::creator::InstanceCreator;
use crate::descriptors::{ComponentDescriptor, ComponentInfo, FactoryObject};
use crate::error::{DiError, DiResult};
use crate::internal::{with_depth_guard, Map, RwLock};
use crate::key::Key;
use crate::managers::InstanceManager;
use crate::observer::Observers;
use crate::registration::ComponentRegistry;
use crate::scope::ScopeId;
use crate::scope_registry::ScopeRegistry;
use crate::traits::ResolverCore;

mod builder;

pub use builder::ContainerBuilder;

/// Dependency injection container.
///
/// Maps component keys to [`ComponentDescriptor`]s and resolves them into
/// fully constructed, fully injected instances. `Container` is a cheap
/// handle: clones share the same registries and caches. Two containers
/// created separately never share cached instances, even with identical
/// registrations.
///
/// Registration is meant for a setup phase; resolution is thread-safe. The
/// container holds no lock while resolving; all mutual exclusion lives in
/// the instance managers that need it.
///
/// # Examples
///
/// ```
/// use scoped_di::{Container, ComponentDescriptor, Key, Resolver, ScopeId};
/// use std::sync::Arc;
///
/// struct DbKey;
/// struct Db { dialect: &'static str }
/// struct Dao { db: Option<Arc<Db>> }
///
/// let container = Container::new();
/// container
///     .register(
///         Key::of::<DbKey>(),
///         ComponentDescriptor::of(|_| Ok(Db { dialect: "pgsql" })).in_scope(ScopeId::SINGLETON),
///     )
///     .register(
///         "Dao",
///         ComponentDescriptor::of(|args| Ok(Dao { db: args.optional("db")? }))
///             .depends_on("db", Key::of::<DbKey>()),
///     );
///
/// let a = container.get::<Dao>("Dao").unwrap();
/// let b = container.get::<Dao>("Dao").unwrap();
///
/// // Dao is transient, its Db is a singleton
/// assert!(!Arc::ptr_eq(&a, &b));
/// assert!(Arc::ptr_eq(a.db.as_ref().unwrap(), b.db.as_ref().unwrap()));
/// assert_eq!(a.db.as_ref().unwrap().dialect, "pgsql");
/// ```
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    components: RwLock<ComponentRegistry>,
    scopes: RwLock<ScopeRegistry>,
    methods: RwLock<Map<TypeId, Arc<MethodTable>>>,
    creator: Arc<dyn InstanceCreator>,
    observers: Observers,
    overrides: Map<String, ScopeId>,
}

impl Container {
    /// Creates a container with managers for the built-in scopes.
    pub fn new() -> Self {
        ContainerBuilder::new().build()
    }

    /// Starts configuring a container.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_inner(inner: Arc<ContainerInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ContainerInner> {
        Arc::downgrade(&self.inner)
    }

    /// Returns `true` if both handles refer to the same container.
    pub fn ptr_eq(&self, other: &Container) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ----- Registration -----

    /// Registers `descriptor` under `key`, replacing any previous descriptor.
    ///
    /// Dependencies are not checked here; a missing dependency fails when
    /// the component is resolved.
    pub fn register(&self, key: impl Into<Key>, descriptor: ComponentDescriptor) -> &Self {
        let key = key.into();
        let descriptor = self.apply_override(&key, descriptor);
        if let Some(table) = descriptor.method_table() {
            self.inner
                .methods
                .write()
                .insert(table.instance_type(), table.clone());
        }
        let replaced = self
            .inner
            .components
            .write()
            .insert(key.clone(), Arc::new(descriptor));
        tracing::trace!(target: "scoped_di", key = %key, replaced = replaced.is_some(), "registered component");
        self
    }

    /// Removes the descriptor for `key`. Cached instances are kept by their managers.
    pub fn unregister(&self, key: impl Into<Key>) -> bool {
        self.inner.components.write().remove(&key.into()).is_some()
    }

    /// Registers the injectable methods of `T`.
    ///
    /// Needed when instances of `T` reach the container through a descriptor
    /// built without [`ComponentDescriptor::injectable`].
    pub fn register_injectable<T: Injectable>(&self) -> &Self {
        let table = MethodTable::of::<T>();
        self.inner
            .methods
            .write()
            .insert(table.instance_type(), Arc::new(table));
        self
    }

    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.inner.components.read().contains_key(&key.into())
    }

    /// The descriptor registered for `key`.
    pub fn descriptor(&self, key: &Key) -> DiResult<Arc<ComponentDescriptor>> {
        self.inner
            .components
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| DiError::UnknownComponent(key.clone()))
    }

    /// Snapshot of every registration, sorted by key.
    pub fn components(&self) -> Vec<ComponentInfo> {
        let mut infos: Vec<ComponentInfo> = self
            .inner
            .components
            .read()
            .iter()
            .map(|(key, descriptor)| ComponentInfo::new(key, descriptor))
            .collect();
        infos.sort_by(|a, b| a.key.cmp(&b.key));
        infos
    }

    pub fn len(&self) -> usize {
        self.inner.components.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ----- Scopes -----

    /// Registers `manager` for `scope`, replacing the previous manager and its cache.
    pub fn set_scope<M>(&self, scope: ScopeId, manager: M) -> &Self
    where
        M: InstanceManager + 'static,
    {
        self.inner.scopes.write().set(scope, manager);
        self
    }

    pub fn has_scope(&self, scope: &ScopeId) -> bool {
        self.inner.scopes.read().has(scope)
    }

    /// The manager registered for `scope`.
    pub fn scope_manager(&self, scope: &ScopeId) -> DiResult<Arc<dyn InstanceManager>> {
        self.inner.scopes.read().get(scope)
    }

    /// Drops the instances every scope manager cached for `thread`.
    ///
    /// Returns the number of dropped instances. Call it for threads that are
    /// about to finish; per-thread singletons otherwise outlive them.
    pub fn release_thread(&self, thread: ThreadId) -> usize {
        let managers = self.inner.scopes.read().managers();
        let released: usize = managers.iter().map(|m| m.release_thread(thread)).sum();
        if released > 0 {
            tracing::debug!(target: "scoped_di", ?thread, released, "released per-thread instances");
        }
        released
    }

    /// [`Container::release_thread`] for the calling thread.
    pub fn release_current_thread(&self) -> usize {
        self.release_thread(thread::current().id())
    }

    // ----- Resolution -----

    /// Resolves a fully constructed, fully injected instance for `key`.
    ///
    /// # Errors
    ///
    /// - [`DiError::UnknownComponent`] if `key`, or any key it depends on,
    ///   is not registered
    /// - [`DiError::Construction`] if a constructor, factory accessor or
    ///   `post_init` hook fails
    pub fn instance_for(&self, key: impl Into<Key>) -> DiResult<Instance> {
        self.resolve(&key.into())
    }

    /// Physically constructs a new raw instance for `key`, bypassing scope caches.
    ///
    /// Resolves the dependency aliases, invokes the instance creator and, for
    /// non-factory components, binds the container and runs `post_init`. For
    /// factory components the raw instance is the factory object. Instance
    /// managers call this on a cache miss.
    pub fn construct(&self, key: &Key) -> DiResult<Instance> {
        let descriptor = self.descriptor(key)?;

        let mut args = Args::new();
        for (param, dependency) in descriptor.dependencies() {
            args.insert_instance(param.clone(), self.resolve(dependency)?);
        }

        tracing::debug!(
            target: "scoped_di",
            key = %key,
            type_name = descriptor.source().type_name(),
            "constructing component"
        );
        let instance = self
            .inner
            .creator
            .create_instance(self, key, descriptor.source(), args)?;

        if !descriptor.is_factory() {
            self.initialize(key, &instance)?;
        }
        Ok(instance)
    }

    fn resolve(&self, key: &Key) -> DiResult<Instance> {
        with_depth_guard(|| {
            let observers = &self.inner.observers;
            if !observers.has_observers() {
                return self.resolve_impl(key);
            }

            let start = Instant::now();
            observers.resolving(key);
            let result = self.resolve_impl(key);
            match &result {
                Ok(_) => observers.resolved(key, start.elapsed()),
                Err(err) => observers.construction_failed(key, err),
            }
            result
        })
    }

    fn resolve_impl(&self, key: &Key) -> DiResult<Instance> {
        let descriptor = self.descriptor(key)?;

        let raw = match self.manager_for(key, descriptor.scope()) {
            Some(manager) => manager.get_instance(self, key)?,
            None => self.construct(key)?,
        };

        if descriptor.is_factory() {
            self.produce(key, &raw)
        } else {
            Ok(raw)
        }
    }

    fn manager_for(&self, key: &Key, scope: &ScopeId) -> Option<Arc<dyn InstanceManager>> {
        let manager = self.inner.scopes.read().find(scope);
        if manager.is_none() && *scope != ScopeId::TRANSIENT {
            tracing::debug!(
                target: "scoped_di",
                key = %key,
                scope = %scope,
                "no manager for scope, resolving as transient"
            );
        }
        manager
    }

    /// Invokes the factory accessor on a factory object.
    fn produce(&self, key: &Key, raw: &Instance) -> DiResult<Instance> {
        let factory = raw
            .downcast_ref::<FactoryObject>()
            .ok_or_else(|| DiError::NotAFactory(key.clone()))?;
        let product = factory
            .produce()
            .map_err(|err| DiError::construction(key, err))?;

        tracing::trace!(target: "scoped_di", key = %key, "factory produced instance");
        self.initialize(key, &product)?;
        Ok(product)
    }

    /// Binds the container and runs `post_init`, once per physical object.
    fn initialize(&self, key: &Key, instance: &Instance) -> DiResult<()> {
        let any: &(dyn Any + Send + Sync) = &**instance;
        let table = match self.inner.methods.read().get(&any.type_id()) {
            Some(table) => table.clone(),
            None => return Ok(()),
        };

        // A failed bind means the object was already initialized
        if !table.has_methods() || !table.bind(any, self) {
            return Ok(());
        }

        if let Some(hook) = table.post_init_method() {
            let mut args = Args::new();
            for (param, dependency) in hook.dependencies() {
                args.insert_instance(param.clone(), self.resolve(dependency)?);
            }
            table
                .run_post_init(any, &args)
                .map_err(|err| DiError::construction(key, err))?;
        }
        Ok(())
    }

    fn apply_override(&self, key: &Key, descriptor: ComponentDescriptor) -> ComponentDescriptor {
        match key {
            Key::Name(name) => match self.inner.overrides.get(&**name) {
                Some(scope) => descriptor.in_scope(scope.clone()),
                None => descriptor,
            },
            Key::Marker(_, _) => descriptor,
        }
    }
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &Key) -> DiResult<Instance> {
        self.resolve(key)
    }
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("components", &self.len())
            .field("scopes", &*self.inner.scopes.read())
            .finish()
    }
}
