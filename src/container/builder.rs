//! Container configuration before first use.

use std::sync::Arc;

use crate::creator::{InstanceCreator, SimpleInstanceCreator};
use crate::internal::{Map, RwLock};
use crate::managers::InstanceManager;
use crate::observer::{DiObserver, Observers};
use crate::registration::ComponentRegistry;
use crate::scope::ScopeId;
use crate::scope_registry::ScopeRegistry;

use super::{Container, ContainerInner};

/// Builder for a [`Container`].
///
/// Starts with managers for the built-in scopes and the
/// [`SimpleInstanceCreator`].
///
/// # Examples
///
/// ```
/// use scoped_di::{Container, ScopeId, SingletonManager};
///
/// // Only a custom "request" scope, no built-in scopes
/// let container = Container::builder()
///     .without_default_scopes()
///     .scope(ScopeId::new("request"), SingletonManager::new())
///     .build();
///
/// assert!(container.has_scope(&ScopeId::new("request")));
/// assert!(!container.has_scope(&ScopeId::SINGLETON));
/// ```
pub struct ContainerBuilder {
    pub(crate) scopes: ScopeRegistry,
    pub(crate) creator: Arc<dyn InstanceCreator>,
    pub(crate) observers: Observers,
    pub(crate) overrides: Map<String, ScopeId>,
}

impl ContainerBuilder {
    pub fn new() -> Self {
        Self {
            scopes: ScopeRegistry::with_defaults(),
            creator: Arc::new(SimpleInstanceCreator),
            observers: Observers::new(),
            overrides: Map::default(),
        }
    }

    /// Drops the built-in scope managers; every scope is transient until
    /// one is registered.
    pub fn without_default_scopes(mut self) -> Self {
        self.scopes = ScopeRegistry::new();
        self
    }

    /// Replaces the whole scope registry.
    pub fn scopes(mut self, scopes: ScopeRegistry) -> Self {
        self.scopes = scopes;
        self
    }

    /// Registers a manager for `scope`.
    pub fn scope<M>(mut self, scope: ScopeId, manager: M) -> Self
    where
        M: InstanceManager + 'static,
    {
        self.scopes.set(scope, manager);
        self
    }

    /// Installs a custom instance creator.
    pub fn creator<C>(mut self, creator: C) -> Self
    where
        C: InstanceCreator + 'static,
    {
        self.creator = Arc::new(creator);
        self
    }

    /// Adds a resolution observer.
    pub fn observer(mut self, observer: Arc<dyn DiObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    /// Forces the scope of the component registered under the name key `name`.
    pub fn scope_override(mut self, name: impl Into<String>, scope: ScopeId) -> Self {
        self.overrides.insert(name.into(), scope);
        self
    }

    pub fn build(self) -> Container {
        Container::from_inner(Arc::new(ContainerInner {
            components: RwLock::new(ComponentRegistry::new()),
            scopes: RwLock::new(self.scopes),
            methods: RwLock::new(Map::default()),
            creator: self.creator,
            observers: self.observers,
            overrides: self.overrides,
        }))
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
