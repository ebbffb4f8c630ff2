//! Positional list reconciliation.
//!
//! Each cycle runs to completion before the next one starts:
//! 1. Every node from the previous cycle is handed to the host for disposal.
//! 2. One node per item is instantiated and inserted after the node before
//!    it, starting from the reconciler's anchor.
//!
//! Nodes are never reused across cycles, so the surface always mirrors the
//! item order seen by the latest cycle.

use crate::binding::Binding;
use crate::context::{ItemContext, Position};
use crate::error::RenderResult;
use crate::host::RenderHost;
use crate::scope::CollectionScope;
use recoll_model::EntityCollection;
use tracing::debug;

/// What the last cycle rendered from.
struct Observed {
    collection: Option<EntityCollection>,
    revision: u64,
}

/// Keeps a host surface in step with one bound collection.
pub struct ListReconciler<H: RenderHost> {
    binding: Binding,
    host: H,
    anchor: H::Node,
    previous: Vec<H::Node>,
    observed: Option<Observed>,
}

impl<H: RenderHost> ListReconciler<H> {
    /// Creates the reconciler and asks the host for its anchor node.
    pub fn new(binding: Binding, mut host: H) -> Self {
        let anchor = host.anchor();
        Self {
            binding,
            host,
            anchor,
            previous: Vec::new(),
            observed: None,
        }
    }

    /// Parses `expression` and creates the reconciler.
    pub fn from_expression(expression: &str, host: H) -> RenderResult<Self> {
        Ok(Self::new(Binding::parse(expression)?, host))
    }

    /// The parsed binding expression.
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// The rendering surface.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the rendering surface.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The placeholder node every cycle inserts after.
    pub fn anchor(&self) -> &H::Node {
        &self.anchor
    }

    /// Nodes created by the latest cycle, in item order.
    pub fn rendered(&self) -> &[H::Node] {
        &self.previous
    }

    /// Runs one cycle against `collection`. Returns the number of nodes rendered.
    ///
    /// An absent collection clears the surface.
    pub fn reconcile(&mut self, collection: Option<&EntityCollection>) -> usize {
        let disposed = self.previous.len();
        for node in self.previous.drain(..) {
            self.host.dispose(node);
        }

        let mut revision = 0;
        if let Some(collection) = collection {
            revision = collection.revision();
            let items = collection.entities();
            let length = items.len();
            let mut previous_node = self.anchor.clone();

            for (index, entity) in items.into_iter().enumerate() {
                let context =
                    ItemContext::new(self.binding.alias(), entity, Position::new(index, length));
                let node = self.host.instantiate(context);
                self.host.insert_after(&node, &previous_node);
                previous_node = node.clone();
                self.previous.push(node);
            }
        }

        self.observed = Some(Observed {
            collection: collection.cloned(),
            revision,
        });

        debug!(
            "reconciled {}: disposed {}, rendered {}",
            self.binding,
            disposed,
            self.previous.len()
        );
        self.previous.len()
    }

    /// Resolves the binding in `scope` and runs a cycle if the collection was
    /// swapped, mutated, or this is the first check. Returns whether a cycle ran.
    pub fn watch(&mut self, scope: &CollectionScope) -> bool {
        let current = scope.get(self.binding.collection());
        let changed = match (&self.observed, &current) {
            (None, _) => true,
            (Some(seen), None) => seen.collection.is_some(),
            (Some(seen), Some(collection)) => {
                !seen
                    .collection
                    .as_ref()
                    .is_some_and(|previous| previous.same(collection))
                    || seen.revision != collection.revision()
            }
        };

        if changed {
            self.reconcile(current.as_ref());
        }
        changed
    }
}
