//! Scope-specific instance managers.
//!
//! Each manager owns the cache for one scope id and decides when a
//! physical construction happens. On a cache miss a manager calls
//! [`Container::construct`], which resolves the component's dependencies,
//! runs the instance creator and the post-construction hook. Failed
//! constructions are never cached: the next call retries.
//!
//! | Manager | Cache key | Concurrent first access |
//! |---|---|---|
//! | [`SingletonManager`] | component key | exactly one construction, per-key gate |
//! | [`ThreadSingletonManager`] | component key + thread | threads never share |
//! | [`ConcurrentSingletonManager`] | component key | exactly one construction, slot per key |

use std::thread::ThreadId;

use crate::args::Instance;
use crate::container::Container;
use crate::error::DiResult;
use crate::key::Key;

mod concurrent;
mod singleton;
mod thread;

pub use concurrent::ConcurrentSingletonManager;
pub use singleton::SingletonManager;
pub use thread::ThreadSingletonManager;

/// Caching policy for one scope.
///
/// Implementations must be shareable across threads; any locking lives
/// inside the manager, never in the container.
///
/// # Examples
///
/// A manager that never caches, i.e. explicit transient behaviour:
///
/// ```rust
/// use scoped_di::{Container, ComponentDescriptor, DiResult, Instance, InstanceManager, Key, ScopeId};
/// use std::sync::Arc;
///
/// struct NoCache;
///
/// impl InstanceManager for NoCache {
///     fn get_instance(&self, container: &Container, key: &Key) -> DiResult<Instance> {
///         container.construct(key)
///     }
/// }
///
/// let container = Container::new();
/// container.set_scope(ScopeId::new("fresh"), NoCache);
/// container.register("n", ComponentDescriptor::of(|_| Ok(1u8)).in_scope(ScopeId::new("fresh")));
///
/// let a = container.instance_for("n").unwrap();
/// let b = container.instance_for("n").unwrap();
/// assert!(!Arc::ptr_eq(&a, &b));
/// ```
pub trait InstanceManager: Send + Sync {
    /// Returns the cached instance for `key`, constructing it through
    /// `container` when the cache has none.
    fn get_instance(&self, container: &Container, key: &Key) -> DiResult<Instance>;

    /// Number of cached instances, for diagnostics.
    fn cached(&self) -> usize {
        0
    }

    /// Drops every instance cached for `thread` and returns how many were
    /// dropped. Only per-thread managers hold such entries.
    fn release_thread(&self, _thread: ThreadId) -> usize {
        0
    }
}
