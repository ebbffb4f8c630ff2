//! The rendering surface contract and an in-memory implementation.

use crate::context::ItemContext;
use std::collections::HashMap;

/// A surface the reconciler renders onto.
///
/// Nodes are opaque handles; the host owns whatever they point at.
pub trait RenderHost {
    type Node: Clone;

    /// Creates the placeholder node that marks where the list begins.
    fn anchor(&mut self) -> Self::Node;

    /// Builds a node for one item.
    fn instantiate(&mut self, context: ItemContext) -> Self::Node;

    /// Places `node` directly after `sibling`.
    fn insert_after(&mut self, node: &Self::Node, sibling: &Self::Node);

    /// Takes `node` off the surface. May finish asynchronously (e.g. after a
    /// leave animation); the reconciler does not wait.
    fn dispose(&mut self, node: Self::Node);
}

/// Handle to a node on a [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// An in-memory surface: an ordered list of nodes.
#[derive(Debug, Default)]
pub struct MemoryHost {
    next_id: u64,
    surface: Vec<NodeId>,
    contexts: HashMap<NodeId, ItemContext>,
    anchor: Option<NodeId>,
    created: usize,
    disposed: usize,
}

impl MemoryHost {
    /// An empty surface; the anchor is placed by the reconciler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every node on the surface, anchor included, in surface order.
    pub fn surface(&self) -> &[NodeId] {
        &self.surface
    }

    /// Contexts of the rendered item nodes, in surface order.
    pub fn rendered(&self) -> Vec<&ItemContext> {
        self.surface
            .iter()
            .filter_map(|id| self.contexts.get(id))
            .collect()
    }

    /// The context `node` was instantiated from, while it is alive.
    pub fn context(&self, node: NodeId) -> Option<&ItemContext> {
        self.contexts.get(&node)
    }

    /// The placeholder node, once created.
    pub fn anchor_node(&self) -> Option<NodeId> {
        self.anchor
    }

    /// Number of item nodes instantiated so far.
    pub fn created(&self) -> usize {
        self.created
    }

    /// Number of nodes disposed so far.
    pub fn disposed(&self) -> usize {
        self.disposed
    }

    fn allocate(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }
}

impl RenderHost for MemoryHost {
    type Node = NodeId;

    fn anchor(&mut self) -> NodeId {
        let id = self.allocate();
        self.surface.push(id);
        self.anchor = Some(id);
        id
    }

    fn instantiate(&mut self, context: ItemContext) -> NodeId {
        let id = self.allocate();
        self.contexts.insert(id, context);
        self.created += 1;
        id
    }

    fn insert_after(&mut self, node: &NodeId, sibling: &NodeId) {
        self.surface.retain(|id| id != node);
        match self.surface.iter().position(|id| id == sibling) {
            Some(at) => self.surface.insert(at + 1, *node),
            None => self.surface.push(*node),
        }
    }

    fn dispose(&mut self, node: NodeId) {
        self.surface.retain(|id| *id != node);
        if self.contexts.remove(&node).is_some() {
            self.disposed += 1;
        }
    }
}
