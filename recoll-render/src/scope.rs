//! The registry a reconciler looks its collection up in.

use recoll_model::EntityCollection;
use std::collections::HashMap;

/// Named collections that bindings resolve against.
#[derive(Debug, Clone, Default)]
pub struct CollectionScope {
    collections: HashMap<String, EntityCollection>,
}

impl CollectionScope {
    /// An empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `collection` under `name`, returning whatever was bound before.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        collection: EntityCollection,
    ) -> Option<EntityCollection> {
        self.collections.insert(name.into(), collection)
    }

    /// The collection bound under `name`, if any.
    pub fn get(&self, name: &str) -> Option<EntityCollection> {
        self.collections.get(name).cloned()
    }

    /// Unbinds `name`.
    pub fn remove(&mut self, name: &str) -> Option<EntityCollection> {
        self.collections.remove(name)
    }
}
