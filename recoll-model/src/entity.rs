//! A single remote record and its operation lifecycle.

use crate::collection::{CollectionInner, EntityCollection};
use crate::error::{ModelError, ModelResult};
use crate::pending::Pending;
use recoll_resource::{Operation, RemoteResource, ResourcePath, ResourceResult};
use recoll_types::{Record, RecordId};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, warn};

/// Handle to one remote record.
///
/// Cloning the handle does not copy the record: clones share state and
/// compare equal under [`same`](Self::same), which is the identity the
/// collection uses for membership.
#[derive(Clone)]
pub struct Entity {
    inner: Arc<EntityInner>,
}

struct EntityInner {
    resource: Arc<dyn RemoteResource>,
    path: ResourcePath,
    state: Mutex<EntityState>,
}

struct EntityState {
    record: Record,
    /// False exactly while `pending` is set.
    resolved: bool,
    pending: Option<Pending<Record>>,
    /// Bumped per issued operation; only the latest may resolve.
    generation: u64,
    /// Back-reference to the collection this entity was last pushed into.
    collection: Option<Weak<CollectionInner>>,
}

impl Entity {
    /// Wraps `record` without contacting the remote side.
    pub fn new(
        resource: Arc<dyn RemoteResource>,
        path: impl Into<ResourcePath>,
        record: Record,
    ) -> Self {
        Self {
            inner: Arc::new(EntityInner {
                resource,
                path: path.into(),
                state: Mutex::new(EntityState {
                    record,
                    resolved: true,
                    pending: None,
                    generation: 0,
                    collection: None,
                }),
            }),
        }
    }

    /// Snapshot of the local record.
    pub fn record(&self) -> Record {
        self.state().record.clone()
    }

    /// The record id, if it has one.
    pub fn id(&self) -> Option<RecordId> {
        self.state().record.id()
    }

    /// Whether the record has never been assigned an id.
    pub fn is_new(&self) -> bool {
        self.id().is_none()
    }

    /// True when no operation is in flight and the last one succeeded.
    pub fn is_resolved(&self) -> bool {
        self.state().resolved
    }

    /// The in-flight (or failed) operation, if any.
    pub fn pending(&self) -> Option<Pending<Record>> {
        self.state().pending.clone()
    }

    /// The failure of the most recent operation, if it failed.
    pub fn error(&self) -> Option<ModelError> {
        self.pending()
            .and_then(|p| p.outcome())
            .and_then(Result::err)
    }

    /// The resource path operations address.
    pub fn path(&self) -> &ResourcePath {
        &self.inner.path
    }

    /// The collection this entity was last pushed into, if it still exists.
    pub fn collection(&self) -> Option<EntityCollection> {
        self.state()
            .collection
            .as_ref()
            .and_then(Weak::upgrade)
            .map(EntityCollection::from_inner)
    }

    /// Sets a field on the local record.
    pub fn set(&self, field: impl Into<String>, value: Value) -> &Self {
        self.state().record.insert(field, value);
        self
    }

    /// Whether both handles refer to the same entity.
    pub fn same(&self, other: &Entity) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Waits for the current operation and returns the resulting record.
    ///
    /// Returns immediately when nothing is in flight.
    pub async fn wait(&self) -> ModelResult<Record> {
        if let Some(pending) = self.pending() {
            pending.await?;
        }
        Ok(self.record())
    }

    /// Fetches the record by `id`, or by the record's own id.
    pub fn get(&self, id: Option<RecordId>) -> &Self {
        let Some(id) = id.or_else(|| self.id()) else {
            self.reject(Operation::FetchOne);
            return self;
        };

        let resource = Arc::clone(&self.inner.resource);
        let path = self.inner.path.clone();
        self.track(Operation::FetchOne, async move {
            resource.fetch_one(&path, &id).await
        });
        self
    }

    /// Creates the record remotely if it is new, otherwise updates it.
    pub fn save(&self) -> &Self {
        self.start_save();
        self
    }

    /// Deletes the record remotely.
    ///
    /// The entity leaves its collection right away, before the request
    /// settles.
    pub fn remove(&self) -> &Self {
        if let Some(collection) = self.collection() {
            collection.remove(self);
        }

        let record = self.record();
        if record.id().is_none() {
            self.reject(Operation::Delete);
            return self;
        }

        let resource = Arc::clone(&self.inner.resource);
        let path = self.inner.path.clone();
        self.track(Operation::Delete, async move {
            resource.delete(&path, &record).await
        });
        self
    }

    /// Alias for [`remove`](Self::remove).
    pub fn del(&self) -> &Self {
        self.remove()
    }

    pub(crate) fn start_save(&self) -> Pending<Record> {
        let record = self.record();
        let resource = Arc::clone(&self.inner.resource);
        let path = self.inner.path.clone();
        match record.id() {
            Some(id) => self.track(Operation::Update, async move {
                resource.update(&path, &id, &record).await
            }),
            None => self.track(Operation::Create, async move {
                resource.create(&path, &record).await
            }),
        }
    }

    pub(crate) fn attach(&self, collection: Weak<CollectionInner>) {
        self.state().collection = Some(collection);
    }

    /// Clears the back-reference if it points at `collection`.
    pub(crate) fn detach(&self, collection: &Weak<CollectionInner>) {
        let mut state = self.state();
        if state
            .collection
            .as_ref()
            .is_some_and(|current| current.ptr_eq(collection))
        {
            state.collection = None;
        }
    }

    fn from_weak(inner: &Weak<EntityInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    fn state(&self) -> MutexGuard<'_, EntityState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issues `request` as the entity's current operation.
    fn track<F>(&self, operation: Operation, request: F) -> Pending<Record>
    where
        F: Future<Output = ResourceResult<Record>> + Send + 'static,
    {
        let weak = Arc::downgrade(&self.inner);
        let mut state = self.state();
        state.generation += 1;
        let generation = state.generation;

        let pending = Pending::new(async move {
            let outcome = request
                .await
                .map_err(|e| ModelError::remote(operation, e));
            if let Some(entity) = Entity::from_weak(&weak) {
                entity.settle(operation, generation, &outcome);
            }
            outcome
        });

        state.resolved = false;
        state.pending = Some(pending.clone());
        drop(state);

        debug!("{} issued for {}", operation, self.inner.path);
        pending.drive();
        pending
    }

    /// Fails an operation that could not be issued.
    fn reject(&self, operation: Operation) -> Pending<Record> {
        let pending = Pending::settled(Err(ModelError::MissingIdentifier { operation }));
        let mut state = self.state();
        state.generation += 1;
        state.resolved = false;
        state.pending = Some(pending.clone());
        warn!("{} on {} rejected: no id", operation, self.inner.path);
        pending
    }

    fn settle(&self, operation: Operation, generation: u64, outcome: &ModelResult<Record>) {
        let mut state = self.state();
        if let Ok(response) = outcome {
            if operation != Operation::Delete {
                state.record.merge(response.clone());
            }
        }

        if state.generation != generation {
            debug!("stale {} settled for {}", operation, self.inner.path);
            return;
        }

        match outcome {
            Ok(_) => {
                state.resolved = true;
                state.pending = None;
                debug!("{} settled for {}", operation, self.inner.path);
            }
            Err(e) => warn!("{} failed for {}: {}", operation, self.inner.path, e),
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Entity")
            .field("path", &self.inner.path)
            .field("record", &state.record)
            .field("resolved", &state.resolved)
            .finish()
    }
}
