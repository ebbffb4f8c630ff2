//! In-memory resource for tests and offline use.
//!
//! [`MockResource`] keeps records per path, assigns numeric ids on create and
//! logs every call. It can also hold calls open until released, which makes
//! settlement order deterministic: issue several operations, then release
//! them in whatever order the scenario needs.

use crate::error::{ResourceError, ResourceResult};
use crate::path::ResourcePath;
use crate::resource::{Operation, RemoteResource};
use async_trait::async_trait;
use recoll_types::{Params, Record, RecordId, ID_FIELD};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;

/// One logged call against a [`MockResource`].
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub operation: Operation,
    pub path: String,
    pub id: Option<RecordId>,
    pub params: Option<Params>,
    pub record: Option<Record>,
}

impl MockCall {
    fn new(operation: Operation, path: &ResourcePath) -> Self {
        Self {
            operation,
            path: path.collection().to_string(),
            id: None,
            params: None,
            record: None,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    store: HashMap<String, Vec<Record>>,
    next_id: i64,
    calls: Vec<MockCall>,
    failures: HashMap<Operation, VecDeque<ResourceError>>,
    paused: bool,
    gates: BTreeMap<usize, oneshot::Sender<()>>,
}

/// What a call learned when it was logged.
struct Admission {
    gate: Option<oneshot::Receiver<()>>,
    failure: Option<ResourceError>,
}

/// An in-memory [`RemoteResource`].
#[derive(Debug, Default)]
pub struct MockResource {
    state: Mutex<MockState>,
}

impl MockResource {
    /// An empty mock that admits every call immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store for `path`.
    pub fn with_records(
        self,
        path: impl Into<ResourcePath>,
        records: impl IntoIterator<Item = Record>,
    ) -> Self {
        {
            let mut state = self.state();
            let path = path.into();
            let records: Vec<Record> = records.into_iter().collect();
            for record in &records {
                if let Some(RecordId::Number(n)) = record.id() {
                    state.next_id = state.next_id.max(n);
                }
            }
            state
                .store
                .entry(path.collection().to_string())
                .or_default()
                .extend(records);
        }
        self
    }

    /// Current contents of the store for `path`.
    pub fn records(&self, path: impl Into<ResourcePath>) -> Vec<Record> {
        let path = path.into();
        self.state()
            .store
            .get(path.collection())
            .cloned()
            .unwrap_or_default()
    }

    /// Every call made so far, in issue order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Makes the next call of kind `operation` fail with `error`.
    pub fn fail_next(&self, operation: Operation, error: ResourceError) {
        self.state()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Holds every subsequent call open until it is released.
    pub fn pause(&self) {
        self.state().paused = true;
    }

    /// Stops holding calls and releases everything currently held.
    pub fn resume(&self) {
        let gates = {
            let mut state = self.state();
            state.paused = false;
            std::mem::take(&mut state.gates)
        };
        for (_, gate) in gates {
            let _ = gate.send(());
        }
    }

    /// Releases the held call at `index` (its position in [`calls`](Self::calls)).
    ///
    /// Returns false if that call is not being held.
    pub fn release(&self, index: usize) -> bool {
        let gate = self.state().gates.remove(&index);
        match gate {
            Some(gate) => gate.send(()).is_ok(),
            None => false,
        }
    }

    /// Indices of calls currently held open.
    pub fn held(&self) -> Vec<usize> {
        self.state().gates.keys().copied().collect()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn admit(&self, call: MockCall) -> Admission {
        let mut state = self.state();
        let index = state.calls.len();
        let failure = state
            .failures
            .get_mut(&call.operation)
            .and_then(VecDeque::pop_front);
        state.calls.push(call);

        let gate = if state.paused {
            let (tx, rx) = oneshot::channel();
            state.gates.insert(index, tx);
            Some(rx)
        } else {
            None
        };
        Admission { gate, failure }
    }

    /// Logs the call, waits for release if paused, then reports any scripted failure.
    async fn enter(&self, call: MockCall) -> ResourceResult<()> {
        let admission = self.admit(call);
        if let Some(gate) = admission.gate {
            // A dropped sender means the mock itself went away; settle anyway.
            let _ = gate.await;
        }
        match admission.failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteResource for MockResource {
    async fn fetch_one(&self, path: &ResourcePath, id: &RecordId) -> ResourceResult<Record> {
        let mut call = MockCall::new(Operation::FetchOne, path);
        call.id = Some(id.clone());
        self.enter(call).await?;

        self.state()
            .store
            .get(path.collection())
            .and_then(|records| {
                records
                    .iter()
                    .find(|r| r.get(ID_FIELD).is_some_and(|v| id.loosely_equals(v)))
            })
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.item(id)))
    }

    async fn fetch_many(
        &self,
        path: &ResourcePath,
        params: &Params,
    ) -> ResourceResult<Vec<Record>> {
        let mut call = MockCall::new(Operation::FetchMany, path);
        call.params = Some(params.clone());
        self.enter(call).await?;

        Ok(self
            .state()
            .store
            .get(path.collection())
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.matches(params))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create(&self, path: &ResourcePath, record: &Record) -> ResourceResult<Record> {
        let mut call = MockCall::new(Operation::Create, path);
        call.record = Some(record.clone());
        self.enter(call).await?;

        let mut state = self.state();
        let mut created = record.clone();
        if created.id().is_none() {
            state.next_id += 1;
            let id = RecordId::Number(state.next_id);
            created.insert(ID_FIELD, id.to_value());
        }
        state
            .store
            .entry(path.collection().to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        path: &ResourcePath,
        id: &RecordId,
        record: &Record,
    ) -> ResourceResult<Record> {
        let mut call = MockCall::new(Operation::Update, path);
        call.id = Some(id.clone());
        call.record = Some(record.clone());
        self.enter(call).await?;

        let mut state = self.state();
        let stored = state
            .store
            .get_mut(path.collection())
            .and_then(|records| {
                records
                    .iter_mut()
                    .find(|r| r.get(ID_FIELD).is_some_and(|v| id.loosely_equals(v)))
            })
            .ok_or_else(|| ResourceError::NotFound(path.item(id)))?;
        *stored = record.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, path: &ResourcePath, record: &Record) -> ResourceResult<Record> {
        let mut call = MockCall::new(Operation::Delete, path);
        call.id = record.id();
        call.record = Some(record.clone());
        self.enter(call).await?;

        let id = record
            .id()
            .ok_or_else(|| ResourceError::InvalidRequest("delete requires an id".into()))?;
        let mut state = self.state();
        let records = state
            .store
            .get_mut(path.collection())
            .ok_or_else(|| ResourceError::NotFound(path.item(&id)))?;
        let position = records
            .iter()
            .position(|r| r.get(ID_FIELD).is_some_and(|v| id.loosely_equals(v)))
            .ok_or_else(|| ResourceError::NotFound(path.item(&id)))?;
        Ok(records.remove(position))
    }
}
