//! Entity and collection synchronization model for recoll.
//!
//! Wraps remote records in local handles that track whether an operation is
//! in flight and merge responses back into local state:
//! - [`Entity`] — one record plus its fetch/save/remove lifecycle
//! - [`EntityCollection`] — an ordered set of entities with bulk query/save
//! - [`Pending`] — the shared, awaitable outcome of an in-flight operation
//! - [`EntityFactory`] — builds both from an explicitly supplied resource
//!
//! # Concurrency
//!
//! Mutation is synchronous and operations settle on the Tokio runtime in the
//! order their requests complete, which is not necessarily issue order. Data
//! from a late response always lands (last write wins); only the most recently
//! issued operation flips the `resolved` flag back to true.
//!
//! # Example
//!
//! ```
//! use recoll_model::EntityFactory;
//! use recoll_resource::mock::MockResource;
//! use recoll_types::Record;
//! use std::sync::Arc;
//!
//! let factory = EntityFactory::new(Arc::new(MockResource::new()));
//! let todos = factory.collection("/todos", Default::default());
//!
//! let mut record = Record::new();
//! record.insert("id", 1.into());
//! todos.push(record);
//!
//! assert_eq!(todos.len(), 1);
//! assert!(todos.get(1).is_some());
//! ```

mod collection;
mod entity;
mod error;
mod factory;
mod pending;

pub use collection::{EntityCollection, Member};
pub use entity::Entity;
pub use error::{ModelError, ModelResult};
pub use factory::EntityFactory;
pub use pending::Pending;
