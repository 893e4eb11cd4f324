use std::thread::{self, ThreadId};

use crate::args::Instance;
use crate::container::Container;
use crate::error::DiResult;
use crate::internal::{Map, Mutex};
use crate::key::Key;

use super::InstanceManager;

/// One instance per component key and calling thread.
///
/// Entries are keyed by `(key, thread id)`, so each thread's entries are
/// disjoint and no thread ever observes another thread's instance.
///
/// Entries are not dropped when a thread finishes. Long-lived thread pools
/// are unaffected, but code that spawns many short-lived threads should
/// call [`Container::release_current_thread`] (or
/// [`InstanceManager::release_thread`]) before a thread exits, otherwise
/// its instances stay cached until the manager is dropped.
///
/// # Examples
///
/// ```
/// use scoped_di::{Container, ComponentDescriptor, ScopeId};
/// use std::thread;
///
/// let container = Container::new();
/// container.register("buffer", ComponentDescriptor::of(|_| Ok(Vec::<u8>::new())).in_scope(ScopeId::THREAD));
///
/// let worker = container.clone();
/// thread::spawn(move || {
///     worker.instance_for("buffer").unwrap();
///     assert_eq!(worker.release_current_thread(), 1);
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(container.scope_manager(&ScopeId::THREAD).unwrap().cached(), 0);
/// ```
#[derive(Default)]
pub struct ThreadSingletonManager {
    instances: Mutex<Map<(Key, ThreadId), Instance>>,
}

impl ThreadSingletonManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InstanceManager for ThreadSingletonManager {
    fn get_instance(&self, container: &Container, key: &Key) -> DiResult<Instance> {
        let slot = (key.clone(), thread::current().id());
        if let Some(cached) = self.instances.lock().get(&slot) {
            return Ok(cached.clone());
        }

        // Only this thread writes this slot, the lock just guards the map
        let value = container.construct(key)?;
        self.instances.lock().insert(slot, value.clone());
        Ok(value)
    }

    fn cached(&self) -> usize {
        self.instances.lock().len()
    }

    fn release_thread(&self, thread: ThreadId) -> usize {
        let mut instances = self.instances.lock();
        let before = instances.len();
        instances.retain(|(_, owner), _| *owner != thread);
        before - instances.len()
    }
}
