//! Renders an [`EntityCollection`](recoll_model::EntityCollection) as an
//! ordered run of host nodes.
//!
//! - [`Binding`] — parsed `<alias> in <collection>` expression
//! - [`ItemContext`] / [`Position`] — what each rendered node sees
//! - [`RenderHost`] — the surface that creates, places and disposes nodes
//! - [`MemoryHost`] — an in-memory surface for tests and headless use
//! - [`ListReconciler`] — rebuilds the nodes whenever the collection changes
//! - [`CollectionScope`] — named collections a binding resolves against
//!
//! Reconciliation is positional: every cycle disposes all nodes from the
//! previous cycle and creates one fresh node per item, in item order.
//!
//! # Example
//!
//! ```
//! use recoll_model::EntityFactory;
//! use recoll_render::{CollectionScope, ListReconciler, MemoryHost};
//! use recoll_resource::mock::MockResource;
//! use recoll_types::Record;
//! use std::sync::Arc;
//!
//! let factory = EntityFactory::new(Arc::new(MockResource::new()));
//! let todos = factory.collection("todos", Default::default());
//! todos.push(Record::new());
//! todos.push(Record::new());
//!
//! let mut scope = CollectionScope::new();
//! scope.insert("todos", todos.clone());
//!
//! let mut list = ListReconciler::from_expression("todo in todos", MemoryHost::new()).unwrap();
//! assert!(list.watch(&scope));
//! assert_eq!(list.host().rendered().len(), 2);
//!
//! // Nothing changed since the last cycle.
//! assert!(!list.watch(&scope));
//! ```

mod binding;
mod context;
mod error;
mod host;
mod reconciler;
mod scope;

pub use binding::Binding;
pub use context::{ItemContext, Position};
pub use error::{RenderError, RenderResult};
pub use host::{MemoryHost, NodeId, RenderHost};
pub use reconciler::ListReconciler;
pub use scope::CollectionScope;
