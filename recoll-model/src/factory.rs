//! Explicit construction of entities and collections over one resource.

use crate::collection::{EntityCollection, Member};
use crate::entity::Entity;
use recoll_resource::{RemoteResource, ResourcePath};
use recoll_types::{Params, Record};
use std::sync::Arc;

/// Builds entities and collections that share one remote resource.
#[derive(Clone)]
pub struct EntityFactory {
    resource: Arc<dyn RemoteResource>,
}

impl EntityFactory {
    /// A factory whose products all talk to `resource`.
    pub fn new(resource: Arc<dyn RemoteResource>) -> Self {
        Self { resource }
    }

    /// The shared resource.
    pub fn resource(&self) -> &Arc<dyn RemoteResource> {
        &self.resource
    }

    /// Wraps `record` in an entity addressed at `path`.
    pub fn entity(&self, path: impl Into<ResourcePath>, record: Record) -> Entity {
        Entity::new(Arc::clone(&self.resource), path, record)
    }

    /// Creates an empty collection at `path` with default query params.
    pub fn collection(
        &self,
        path: impl Into<ResourcePath>,
        default_params: Params,
    ) -> EntityCollection {
        EntityCollection::new(Arc::clone(&self.resource), path, default_params)
    }

    /// Creates a collection at `path` holding `initial`.
    pub fn collection_with<I>(
        &self,
        path: impl Into<ResourcePath>,
        default_params: Params,
        initial: I,
    ) -> EntityCollection
    where
        I: IntoIterator,
        I::Item: Into<Member>,
    {
        EntityCollection::with_members(Arc::clone(&self.resource), path, default_params, initial)
    }
}
