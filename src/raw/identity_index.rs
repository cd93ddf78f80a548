use alloc::string::String;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;

/// Exact-match index from record identifier to a value (a record handle in practice).
pub(crate) struct IdentityIndex<V> {
    map: HashMap<String, V>,
}

impl<V> IdentityIndex<V> {
    pub(crate) fn new() -> Self {
        Self { map: HashMap::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.map.capacity()
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    /// Stores `id -> value` unless `id` is already present; the existing mapping is never
    /// overwritten.
    pub(crate) fn insert(&mut self, id: String, value: V) -> bool {
        match self.map.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    pub(crate) fn get(&self, id: &str) -> Option<&V> {
        self.map.get(id)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<V> {
        self.map.remove(id)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
    }

    #[cfg(test)]
    pub(crate) fn values(&self) -> impl Iterator<Item = &V> {
        self.map.values()
    }
}
