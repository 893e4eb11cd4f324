use std::sync::Arc;

#[cfg(feature = "once-cell")]
use once_cell::sync::OnceCell;

use crate::args::Instance;
use crate::container::Container;
use crate::error::DiResult;
use crate::internal::{Map, Mutex};
use crate::key::Key;

use super::InstanceManager;

#[cfg(feature = "once-cell")]
type Slot = OnceCell<Instance>;
#[cfg(not(feature = "once-cell"))]
type Slot = Mutex<Option<Instance>>;

/// Singleton that stays correct under concurrent first access.
///
/// Each component key gets its own slot. The first caller constructs while
/// holding the slot; callers that lose the race block until construction
/// finishes and then return the winner's instance. Exactly one construction
/// happens, nobody sees a partially built instance, and a failed
/// construction leaves the slot empty for the next caller to retry.
///
/// Different keys never contend on the same slot, so a concurrency
/// singleton may depend on another one. A component that (transitively)
/// depends on itself deadlocks here.
///
/// # Examples
///
/// ```
/// use scoped_di::{Container, ComponentDescriptor, ScopeId};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::thread;
///
/// static BUILT: AtomicUsize = AtomicUsize::new(0);
///
/// let container = Container::new();
/// container.register(
///     "pool",
///     ComponentDescriptor::of(|_| {
///         BUILT.fetch_add(1, Ordering::SeqCst);
///         Ok(vec![1u8, 2, 3])
///     })
///     .in_scope(ScopeId::CONCURRENT),
/// );
///
/// let handles: Vec<_> = (0..8)
///     .map(|_| {
///         let container = container.clone();
///         thread::spawn(move || container.instance_for("pool").unwrap())
///     })
///     .collect();
/// let first = container.instance_for("pool").unwrap();
/// for handle in handles {
///     assert!(Arc::ptr_eq(&first, &handle.join().unwrap()));
/// }
/// assert_eq!(BUILT.load(Ordering::SeqCst), 1);
/// ```
#[derive(Default)]
pub struct ConcurrentSingletonManager {
    slots: Mutex<Map<Key, Arc<Slot>>>,
}

impl ConcurrentSingletonManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &Key) -> Arc<Slot> {
        // Map lock is released before the slot is initialized
        self.slots
            .lock()
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Slot::default()))
            .clone()
    }
}

impl InstanceManager for ConcurrentSingletonManager {
    #[cfg(feature = "once-cell")]
    fn get_instance(&self, container: &Container, key: &Key) -> DiResult<Instance> {
        let slot = self.slot(key);
        if let Some(value) = slot.get() {
            return Ok(value.clone());
        }
        slot.get_or_try_init(|| container.construct(key)).cloned()
    }

    #[cfg(not(feature = "once-cell"))]
    fn get_instance(&self, container: &Container, key: &Key) -> DiResult<Instance> {
        let slot = self.slot(key);
        let mut guard = slot.lock();
        if let Some(value) = guard.as_ref() {
            return Ok(value.clone());
        }

        let value = container.construct(key)?;
        *guard = Some(value.clone());
        Ok(value)
    }

    fn cached(&self) -> usize {
        let slots: Vec<Arc<Slot>> = self.slots.lock().values().cloned().collect();
        slots.iter().filter(|slot| is_populated(slot)).count()
    }
}

#[cfg(feature = "once-cell")]
fn is_populated(slot: &Slot) -> bool {
    slot.get().is_some()
}

#[cfg(not(feature = "once-cell"))]
fn is_populated(slot: &Slot) -> bool {
    slot.lock().is_some()
}
