//! Shared handles to in-flight operations.

use crate::error::ModelResult;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

/// The outcome of an in-flight operation, awaitable any number of times.
///
/// The operation itself runs on the ambient Tokio runtime from the moment it
/// is issued, so local state settles whether or not anyone awaits it. Without
/// a runtime it runs the first time it is awaited.
pub struct Pending<T> {
    inner: Shared<BoxFuture<'static, ModelResult<T>>>,
}

impl<T> Pending<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new<F>(operation: F) -> Self
    where
        F: Future<Output = ModelResult<T>> + Send + 'static,
    {
        Self {
            inner: operation.boxed().shared(),
        }
    }

    /// An already-settled operation.
    pub(crate) fn settled(outcome: ModelResult<T>) -> Self {
        let pending = Self::new(futures::future::ready(outcome));
        // Polling once stores the output so `is_settled` is true immediately.
        let _ = pending.clone().now_or_never();
        pending
    }

    /// Spawns the operation on the current runtime, if there is one.
    pub(crate) fn drive(&self) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let operation = self.clone();
                handle.spawn(async move {
                    let _ = operation.await;
                });
            }
            Err(_) => debug!("no tokio runtime; operation will run when awaited"),
        }
    }

    /// Whether the operation has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        self.inner.peek().is_some()
    }

    /// The outcome, once settled.
    pub fn outcome(&self) -> Option<ModelResult<T>> {
        self.inner.peek().cloned()
    }

    /// Whether both handles refer to the same operation.
    pub fn same(&self, other: &Self) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

impl<T> Clone for Pending<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Future for Pending<T>
where
    T: Clone,
{
    type Output = ModelResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}

impl<T> fmt::Debug for Pending<T>
where
    T: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("settled", &self.inner.peek().is_some())
            .finish()
    }
}
