use std::sync::Arc;

use crate::args::Instance;
use crate::container::Container;
use crate::error::DiResult;
use crate::internal::{Map, Mutex};
use crate::key::Key;

use super::InstanceManager;

/// One instance per component key for the lifetime of the container.
///
/// Finished instances live in a single map that every hit reads. A miss
/// takes a per-key build gate, checks the map again and only then
/// constructs, so concurrent first access still yields exactly one
/// construction (and one `post_init` run). Neither the map nor any other
/// key's gate is held while constructing, which lets a singleton depend
/// on other singletons of the same manager.
///
/// A component that (transitively) depends on itself through this manager
/// deadlocks on its own gate.
#[derive(Default)]
pub struct SingletonManager {
    instances: Mutex<Map<Key, Instance>>,
    gates: Mutex<Map<Key, Arc<Mutex<()>>>>,
}

impl SingletonManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lookup(&self, key: &Key) -> Option<Instance> {
        self.instances.lock().get(key).cloned()
    }

    fn gate(&self, key: &Key) -> Arc<Mutex<()>> {
        self.gates
            .lock()
            .entry(key.clone())
            .or_insert_with(Arc::default)
            .clone()
    }
}

impl InstanceManager for SingletonManager {
    fn get_instance(&self, container: &Container, key: &Key) -> DiResult<Instance> {
        if let Some(cached) = self.lookup(key) {
            return Ok(cached);
        }

        let gate = self.gate(key);
        let _building = gate.lock();
        // Another caller may have finished while we waited on the gate
        if let Some(cached) = self.lookup(key) {
            return Ok(cached);
        }

        let value = container.construct(key)?;
        self.instances.lock().insert(key.clone(), value.clone());
        // A failed build keeps its gate so retries stay serialized
        self.gates.lock().remove(key);
        Ok(value)
    }

    fn cached(&self) -> usize {
        self.instances.lock().len()
    }
}
