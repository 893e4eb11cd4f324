//! Mapping from scope id to instance manager.

use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::internal::Map;
use crate::managers::{
    ConcurrentSingletonManager, InstanceManager, SingletonManager, ThreadSingletonManager,
};
use crate::scope::ScopeId;

/// Scope id → [`InstanceManager`] mapping.
///
/// A pure mapping with no policy of its own. [`ScopeRegistry::new`] starts
/// empty; [`ScopeRegistry::with_defaults`] registers fresh managers for
/// [`ScopeId::SINGLETON`], [`ScopeId::THREAD`] and [`ScopeId::CONCURRENT`].
///
/// # Examples
///
/// ```rust
/// use scoped_di::{ScopeRegistry, ScopeId, SingletonManager};
///
/// let mut registry = ScopeRegistry::new();
/// registry.set(ScopeId::SINGLETON, SingletonManager::new());
///
/// assert!(registry.has(&ScopeId::SINGLETON));
/// assert!(registry.get(&ScopeId::SINGLETON).is_ok());
/// assert!(registry.get(&ScopeId::THREAD).is_err());
/// ```
#[derive(Default)]
pub struct ScopeRegistry {
    managers: Map<ScopeId, Arc<dyn InstanceManager>>,
}

impl ScopeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding new managers for the built-in scopes.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.set(ScopeId::SINGLETON, SingletonManager::new());
        registry.set(ScopeId::THREAD, ThreadSingletonManager::new());
        registry.set(ScopeId::CONCURRENT, ConcurrentSingletonManager::new());
        registry
    }

    /// Registers `manager` for `scope`, replacing any previous manager.
    pub fn set<M>(&mut self, scope: ScopeId, manager: M) -> &mut Self
    where
        M: InstanceManager + 'static,
    {
        self.set_shared(scope, Arc::new(manager))
    }

    /// Registers an already shared manager.
    pub fn set_shared(&mut self, scope: ScopeId, manager: Arc<dyn InstanceManager>) -> &mut Self {
        self.managers.insert(scope, manager);
        self
    }

    pub fn has(&self, scope: &ScopeId) -> bool {
        self.managers.contains_key(scope)
    }

    /// Gets the manager for `scope`, failing with [`DiError::UnknownScope`].
    pub fn get(&self, scope: &ScopeId) -> DiResult<Arc<dyn InstanceManager>> {
        self.find(scope)
            .ok_or_else(|| DiError::UnknownScope(scope.clone()))
    }

    /// Gets the manager for `scope` if one is registered.
    pub fn find(&self, scope: &ScopeId) -> Option<Arc<dyn InstanceManager>> {
        self.managers.get(scope).cloned()
    }

    pub fn remove(&mut self, scope: &ScopeId) -> Option<Arc<dyn InstanceManager>> {
        self.managers.remove(scope)
    }

    /// Registered scope ids, sorted.
    pub fn scopes(&self) -> Vec<ScopeId> {
        let mut scopes: Vec<ScopeId> = self.managers.keys().cloned().collect();
        scopes.sort();
        scopes
    }

    pub(crate) fn managers(&self) -> Vec<Arc<dyn InstanceManager>> {
        self.managers.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

impl fmt::Debug for ScopeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeRegistry").field("scopes", &self.scopes()).finish()
    }
}
