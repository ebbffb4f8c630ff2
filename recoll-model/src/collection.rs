//! Ordered collections of entities with bulk remote operations.

use crate::entity::Entity;
use crate::error::{ModelError, ModelResult};
use crate::pending::Pending;
use futures::stream::{FuturesUnordered, StreamExt};
use recoll_resource::{Operation, RemoteResource, ResourcePath};
use recoll_types::{merge_params, Params, Record, RecordId, ID_FIELD};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Something that can be pushed into a collection.
#[derive(Debug, Clone)]
pub enum Member {
    /// An existing entity, added by reference.
    Entity(Entity),
    /// A raw record, wrapped in a new entity on push.
    Record(Record),
}

impl From<Entity> for Member {
    fn from(entity: Entity) -> Self {
        Self::Entity(entity)
    }
}

impl From<&Entity> for Member {
    fn from(entity: &Entity) -> Self {
        Self::Entity(entity.clone())
    }
}

impl From<Record> for Member {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

/// Handle to an ordered collection of entities backed by one resource path.
///
/// Clones share the same items.
#[derive(Clone)]
pub struct EntityCollection {
    inner: Arc<CollectionInner>,
}

pub(crate) struct CollectionInner {
    resource: Arc<dyn RemoteResource>,
    path: ResourcePath,
    default_params: Params,
    state: Mutex<CollectionState>,
    /// Bumped on every structural mutation.
    revision: watch::Sender<u64>,
}

struct CollectionState {
    items: Vec<Entity>,
    /// Always `items.len()`; refreshed after every mutation.
    count: usize,
    resolved: bool,
    pending: Option<Pending<Vec<Entity>>>,
    generation: u64,
}

impl EntityCollection {
    /// Creates an empty collection.
    pub fn new(
        resource: Arc<dyn RemoteResource>,
        path: impl Into<ResourcePath>,
        default_params: Params,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(CollectionInner {
                resource,
                path: path.into(),
                default_params,
                state: Mutex::new(CollectionState {
                    items: Vec::new(),
                    count: 0,
                    resolved: true,
                    pending: None,
                    generation: 0,
                }),
                revision,
            }),
        }
    }

    /// Creates a collection and pushes each of `initial` into it.
    pub fn with_members<I>(
        resource: Arc<dyn RemoteResource>,
        path: impl Into<ResourcePath>,
        default_params: Params,
        initial: I,
    ) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Member>,
    {
        let collection = Self::new(resource, path, default_params);
        for member in initial {
            collection.push(member);
        }
        collection
    }

    pub(crate) fn from_inner(inner: Arc<CollectionInner>) -> Self {
        Self { inner }
    }

    /// The resource path queries address.
    pub fn path(&self) -> &ResourcePath {
        &self.inner.path
    }

    /// Params every query starts from.
    pub fn default_params(&self) -> &Params {
        &self.inner.default_params
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.state().count
    }

    /// Whether the collection has no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no bulk operation is in flight and the last one succeeded.
    pub fn is_resolved(&self) -> bool {
        self.state().resolved
    }

    /// The in-flight (or failed) bulk operation, if any.
    pub fn pending(&self) -> Option<Pending<Vec<Entity>>> {
        self.state().pending.clone()
    }

    /// The failure of the most recent bulk operation, if it failed.
    pub fn error(&self) -> Option<ModelError> {
        self.pending()
            .and_then(|p| p.outcome())
            .and_then(Result::err)
    }

    /// Waits for the current bulk operation, then returns the items.
    pub async fn wait(&self) -> ModelResult<Vec<Entity>> {
        if let Some(pending) = self.pending() {
            pending.await?;
        }
        Ok(self.entities())
    }

    /// Snapshot of the current items.
    pub fn entities(&self) -> Vec<Entity> {
        self.state().items.clone()
    }

    /// Structural revision; changes whenever items are added, removed or cleared.
    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Subscribes to structural revisions.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Whether both handles refer to the same collection.
    pub fn same(&self, other: &EntityCollection) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Remote operations ────────────────────────────────────────

    /// Replaces the items with the remote records matching the default params
    /// overlaid with `params`.
    ///
    /// Items are cleared now and repopulated when the response arrives.
    /// Overlapping queries each clear on issue and each append on settle.
    pub fn query(&self, params: Option<&Params>) -> &Self {
        let params = merge_params(&self.inner.default_params, params);
        let resource = Arc::clone(&self.inner.resource);
        let path = self.inner.path.clone();
        let weak = Arc::downgrade(&self.inner);

        let mut state = self.state();
        state.generation += 1;
        let generation = state.generation;

        let pending = Pending::new(async move {
            let outcome = resource
                .fetch_many(&path, &params)
                .await
                .map_err(|e| ModelError::remote(Operation::FetchMany, e));
            match weak.upgrade() {
                Some(inner) => EntityCollection { inner }.finish_query(generation, outcome),
                None => outcome.map(|_| Vec::new()),
            }
        });

        state.items.clear();
        state.count = 0;
        state.resolved = false;
        state.pending = Some(pending.clone());
        drop(state);
        self.bump();

        debug!("query issued for {}", self.inner.path);
        pending.drive();
        self
    }

    /// Saves every entity, resolving once all of them have saved.
    ///
    /// The completion target is the item count at call time; items pushed or
    /// removed while the save is in flight are not waited for. When every
    /// captured save has settled and some failed, the bulk operation fails
    /// with [`ModelError::BulkSave`].
    pub fn save(&self) -> &Self {
        let entities = self.entities();
        let total = entities.len();

        let mut state = self.state();
        state.generation += 1;
        let generation = state.generation;

        if total == 0 {
            state.resolved = true;
            state.pending = None;
            debug!("bulk save of empty {} resolved immediately", self.inner.path);
            return self;
        }
        drop(state);

        let saves: FuturesUnordered<_> = entities.iter().map(Entity::start_save).collect();
        let weak = Arc::downgrade(&self.inner);

        let pending = Pending::new(async move {
            let mut saves = saves;
            let mut counter = 0;
            let mut failed = 0;
            while let Some(outcome) = saves.next().await {
                match outcome {
                    Ok(_) => counter += 1,
                    Err(_) => failed += 1,
                }
                if counter == total {
                    break;
                }
            }

            let outcome = if counter == total {
                Ok(entities)
            } else {
                Err(ModelError::BulkSave { failed, total })
            };
            if let Some(inner) = weak.upgrade() {
                EntityCollection { inner }.settle("bulk save", generation, &outcome);
            }
            outcome
        });

        let mut state = self.state();
        state.resolved = false;
        state.pending = Some(pending.clone());
        drop(state);

        debug!("bulk save of {} entities issued for {}", total, self.inner.path);
        pending.drive();
        self
    }

    // ── Membership ───────────────────────────────────────────────

    /// Adds an entity, or wraps a raw record in a new entity and adds that.
    ///
    /// An entity already present (by reference) is not added twice. Either way
    /// its back-reference now points at this collection.
    pub fn push(&self, value: impl Into<Member>) -> Entity {
        let entity = match value.into() {
            Member::Entity(entity) => entity,
            Member::Record(record) => Entity::new(
                Arc::clone(&self.inner.resource),
                self.inner.path.clone(),
                record,
            ),
        };

        let added = {
            let mut state = self.state();
            let present = state.items.iter().any(|e| e.same(&entity));
            if !present {
                state.items.push(entity.clone());
            }
            state.count = state.items.len();
            !present
        };

        entity.attach(Arc::downgrade(&self.inner));
        if added {
            self.bump();
        }
        entity
    }

    /// Alias for [`push`](Self::push).
    pub fn add(&self, value: impl Into<Member>) -> Entity {
        self.push(value)
    }

    /// Removes `entity` if present. Returns whether anything was removed.
    pub fn remove(&self, entity: &Entity) -> bool {
        let removed = {
            let mut state = self.state();
            let position = state.items.iter().position(|e| e.same(entity));
            if let Some(position) = position {
                state.items.remove(position);
            }
            state.count = state.items.len();
            position.is_some()
        };

        if removed {
            entity.detach(&Arc::downgrade(&self.inner));
            self.bump();
        }
        removed
    }

    // ── Lookups ──────────────────────────────────────────────────

    /// First entity whose id loosely equals `id`.
    pub fn get(&self, id: impl Into<RecordId>) -> Option<Entity> {
        let id = id.into();
        self.find_by(|e| {
            e.record()
                .get(ID_FIELD)
                .is_some_and(|value| id.loosely_equals(value))
        })
    }

    /// First entity whose record strictly matches every attribute.
    pub fn find_where(&self, attrs: &Params) -> Option<Entity> {
        self.find_by(|e| e.record().matches(attrs))
    }

    /// Alias for [`find_where`](Self::find_where).
    pub fn find(&self, attrs: &Params) -> Option<Entity> {
        self.find_where(attrs)
    }

    /// Truthy values of `field`, in item order.
    pub fn pluck(&self, field: &str) -> Vec<Value> {
        self.entities()
            .iter()
            .filter_map(|e| e.record().truthy(field).cloned())
            .collect()
    }

    // ── Sequence operations over a snapshot ──────────────────────

    /// Calls `f` on every entity in order.
    pub fn for_each(&self, mut f: impl FnMut(&Entity)) {
        for entity in &self.entities() {
            f(entity);
        }
    }

    /// Alias for [`for_each`](Self::for_each).
    pub fn each(&self, f: impl FnMut(&Entity)) {
        self.for_each(f)
    }

    /// The first entity, if any.
    pub fn first(&self) -> Option<Entity> {
        self.state().items.first().cloned()
    }

    /// The last entity, if any.
    pub fn last(&self) -> Option<Entity> {
        self.state().items.last().cloned()
    }

    /// Position of `entity` by reference.
    pub fn index_of(&self, entity: &Entity) -> Option<usize> {
        self.state().items.iter().position(|e| e.same(entity))
    }

    /// Maps every entity in order.
    pub fn map<T>(&self, f: impl FnMut(&Entity) -> T) -> Vec<T> {
        self.entities().iter().map(f).collect()
    }

    /// First entity satisfying `predicate`.
    pub fn find_by(&self, mut predicate: impl FnMut(&Entity) -> bool) -> Option<Entity> {
        self.entities().into_iter().find(|e| predicate(e))
    }

    // ── Internals ────────────────────────────────────────────────

    fn state(&self) -> MutexGuard<'_, CollectionState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.inner.revision.send_modify(|revision| *revision += 1);
    }

    fn finish_query(
        &self,
        generation: u64,
        outcome: ModelResult<Vec<Record>>,
    ) -> ModelResult<Vec<Entity>> {
        let outcome = outcome.map(|records| {
            records
                .into_iter()
                .map(|record| self.push(record))
                .collect::<Vec<_>>()
        });
        if let Ok(entities) = &outcome {
            info!("query for {} returned {} records", self.inner.path, entities.len());
        }
        self.settle("query", generation, &outcome);
        outcome
    }

    /// Records the outcome of the bulk operation labelled `label`.
    fn settle(&self, label: &str, generation: u64, outcome: &ModelResult<Vec<Entity>>) {
        let mut state = self.state();
        state.count = state.items.len();
        if state.generation != generation {
            debug!("stale {} settled for {}", label, self.inner.path);
            return;
        }
        match outcome {
            Ok(_) => {
                state.resolved = true;
                state.pending = None;
            }
            Err(e) => warn!("{} failed for {}: {}", label, self.inner.path, e),
        }
    }
}

impl fmt::Debug for EntityCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("EntityCollection")
            .field("path", &self.inner.path)
            .field("count", &state.count)
            .field("resolved", &state.resolved)
            .finish()
    }
}
