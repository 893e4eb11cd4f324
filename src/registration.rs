//! Component registry.

use std::sync::Arc;

use crate::descriptors::ComponentDescriptor;
use crate::internal::Map;
use crate::key::Key;

/// Registry holding all component descriptors
pub(crate) struct ComponentRegistry {
    /// Fast Vec lookup for first N registrations (cache-friendly)
    small: Vec<(Key, Arc<ComponentDescriptor>)>,
    /// HashMap fallback for remaining registrations
    large: Map<Key, Arc<ComponentDescriptor>>,
    /// Threshold for Vec vs HashMap
    small_threshold: usize,
}

impl ComponentRegistry {
    pub(crate) fn new() -> Self {
        Self {
            small: Vec::new(),
            large: Map::default(),
            small_threshold: 16,
        }
    }

    /// Inserts or replaces the descriptor for `key`.
    ///
    /// Returns the replaced descriptor, if any.
    pub(crate) fn insert(
        &mut self,
        key: Key,
        descriptor: Arc<ComponentDescriptor>,
    ) -> Option<Arc<ComponentDescriptor>> {
        if let Some(pos) = self.small.iter().position(|(k, _)| k == &key) {
            return Some(std::mem::replace(&mut self.small[pos].1, descriptor));
        }
        if self.small.len() < self.small_threshold && !self.large.contains_key(&key) {
            self.small.push((key, descriptor));
            None
        } else {
            self.large.insert(key, descriptor)
        }
    }

    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&Arc<ComponentDescriptor>> {
        for (k, descriptor) in &self.small {
            if k == key {
                return Some(descriptor);
            }
        }
        self.large.get(key)
    }

    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    pub(crate) fn remove(&mut self, key: &Key) -> Option<Arc<ComponentDescriptor>> {
        if let Some(pos) = self.small.iter().position(|(k, _)| k == key) {
            return Some(self.small.remove(pos).1);
        }
        self.large.remove(key)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Arc<ComponentDescriptor>)> {
        self.small
            .iter()
            .map(|(k, d)| (k, d))
            .chain(self.large.iter())
    }

    pub(crate) fn len(&self) -> usize {
        self.small.len() + self.large.len()
    }
}
