//! Declarative scope configuration.
//!
//! A [`ContainerConfig`] describes which instance managers a container gets
//! and which components have their scope forced, so deployments can change
//! caching policy without touching registration code. It is read from JSON
//! or YAML and applied with [`ContainerBuilder::config`].
//!
//! ```yaml
//! default_scopes: true
//! scopes:
//!   request: singleton
//!   worker: singleton-per-thread
//! overrides:
//!   Dao: concurrency-singleton
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::container::ContainerBuilder;
use crate::error::{DiError, DiResult};
use crate::managers::{
    ConcurrentSingletonManager, InstanceManager, SingletonManager, ThreadSingletonManager,
};
use crate::scope::ScopeId;
use crate::scope_registry::ScopeRegistry;

/// Built-in manager implementations selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManagerKind {
    /// [`SingletonManager`]
    Singleton,
    /// [`ThreadSingletonManager`]
    SingletonPerThread,
    /// [`ConcurrentSingletonManager`]
    ConcurrencySingleton,
}

impl ManagerKind {
    /// Creates a fresh manager of this kind.
    pub fn manager(self) -> Arc<dyn InstanceManager> {
        match self {
            ManagerKind::Singleton => Arc::new(SingletonManager::new()),
            ManagerKind::SingletonPerThread => Arc::new(ThreadSingletonManager::new()),
            ManagerKind::ConcurrencySingleton => Arc::new(ConcurrentSingletonManager::new()),
        }
    }
}

/// Scope configuration for a container.
///
/// # Examples
///
/// ```rust
/// use scoped_di::config::ContainerConfig;
/// use scoped_di::{ComponentDescriptor, Container, ScopeId};
/// use std::sync::Arc;
///
/// let config = ContainerConfig::from_json_str(
///     r#"{ "scopes": { "request": "singleton" }, "overrides": { "Dao": "request" } }"#,
/// ).unwrap();
///
/// let container = Container::builder().config(&config).build();
/// container.register("Dao", ComponentDescriptor::of(|_| Ok(String::from("dao"))));
///
/// assert!(container.has_scope(&ScopeId::new("request")));
/// let a = container.instance_for("Dao").unwrap();
/// let b = container.instance_for("Dao").unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    /// Keep managers for the built-in scopes; `false` removes them
    pub default_scopes: bool,
    /// Additional scopes, scope id → manager kind
    pub scopes: BTreeMap<String, ManagerKind>,
    /// Forced scopes, component name → scope id
    pub overrides: BTreeMap<String, String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            default_scopes: true,
            scopes: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }
}

impl ContainerConfig {
    pub fn from_json_str(input: &str) -> DiResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|err| DiError::Config(format!("invalid JSON configuration: {}", err)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(input: &str) -> DiResult<Self> {
        let config: Self = serde_yaml::from_str(input)
            .map_err(|err| DiError::Config(format!("invalid YAML configuration: {}", err)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file; `.json` files are parsed as JSON,
    /// everything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> DiResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|err| DiError::Config(format!("cannot read {}: {}", path.display(), err)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Checks the configuration for ids that can never take effect.
    pub fn validate(&self) -> DiResult<()> {
        for scope in self.scopes.keys() {
            if scope.is_empty() {
                return Err(DiError::Config("empty scope id".to_string()));
            }
            if scope == ScopeId::TRANSIENT.as_str() {
                return Err(DiError::Config(
                    "the transient scope cannot have a manager".to_string(),
                ));
            }
        }
        for (component, scope) in &self.overrides {
            if component.is_empty() || scope.is_empty() {
                return Err(DiError::Config(format!(
                    "invalid override '{}' -> '{}'",
                    component, scope
                )));
            }
        }
        Ok(())
    }

    /// Builds the scope registry this configuration describes.
    pub fn scope_registry(&self) -> ScopeRegistry {
        let mut registry = ScopeRegistry::with_defaults();
        self.apply_scopes(&mut registry);
        registry
    }

    /// Merges the configured scopes into `registry`.
    ///
    /// Managers already in `registry` stay unless the configuration names
    /// the same scope id. With `default_scopes: false` the built-in scope ids
    /// are removed first.
    pub fn apply_scopes(&self, registry: &mut ScopeRegistry) {
        if !self.default_scopes {
            for scope in [ScopeId::SINGLETON, ScopeId::THREAD, ScopeId::CONCURRENT] {
                registry.remove(&scope);
            }
        }
        for (scope, kind) in &self.scopes {
            registry.set_shared(ScopeId::new(scope.clone()), kind.manager());
        }
    }
}

impl ContainerBuilder {
    /// Applies a [`ContainerConfig`]: merges its scopes into the scopes
    /// configured so far (see [`ContainerConfig::apply_scopes`]) and adds
    /// the scope overrides.
    ///
    /// Scopes added with [`ContainerBuilder::scope`] before or after this
    /// call are kept; a later call wins for the same scope id.
    pub fn config(mut self, config: &ContainerConfig) -> Self {
        config.apply_scopes(&mut self.scopes);
        for (component, scope) in &config.overrides {
            self.overrides
                .insert(component.clone(), ScopeId::new(scope.clone()));
        }
        tracing::debug!(
            target: "scoped_di",
            scopes = self.scopes.len(),
            overrides = config.overrides.len(),
            "applied container configuration"
        );
        self
    }
}
