//! Scope identifiers.

use std::borrow::Cow;
use std::fmt;

/// Opaque token naming a caching policy.
///
/// A scope id only selects an [`InstanceManager`](crate::InstanceManager) from
/// the container's [`ScopeRegistry`](crate::ScopeRegistry). Any id without a
/// registered manager, including [`ScopeId::TRANSIENT`], resolves as transient:
/// every request constructs a fresh instance.
///
/// # Scope Characteristics
///
/// - **Transient**: nothing cached, a new instance per resolution
/// - **Singleton**: one instance per key for the container's lifetime
/// - **Singleton per thread**: one instance per key and calling thread
/// - **Concurrency singleton**: one instance per key, race-free first access
///
/// # Examples
///
/// ```rust
/// use scoped_di::ScopeId;
///
/// assert_eq!(ScopeId::SINGLETON.as_str(), "singleton");
/// assert_eq!(ScopeId::new("request"), ScopeId::new(String::from("request")));
/// assert_ne!(ScopeId::THREAD, ScopeId::CONCURRENT);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(Cow<'static, str>);

impl ScopeId {
    /// No caching. Never registered in a scope registry.
    pub const TRANSIENT: ScopeId = ScopeId(Cow::Borrowed("transient"));
    /// Process-wide singleton per container.
    pub const SINGLETON: ScopeId = ScopeId(Cow::Borrowed("singleton"));
    /// One singleton per calling thread.
    pub const THREAD: ScopeId = ScopeId(Cow::Borrowed("singleton-per-thread"));
    /// Singleton that is constructed exactly once under concurrent first access.
    pub const CONCURRENT: ScopeId = ScopeId(Cow::Borrowed("concurrency-singleton"));

    /// Creates a custom scope id.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        ScopeId(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ScopeId {
    fn default() -> Self {
        ScopeId::TRANSIENT
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ScopeId {
    fn from(id: &'static str) -> Self {
        ScopeId(Cow::Borrowed(id))
    }
}

impl From<String> for ScopeId {
    fn from(id: String) -> Self {
        ScopeId(Cow::Owned(id))
    }
}
