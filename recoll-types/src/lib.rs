//! Core type definitions for recoll.
//!
//! This crate defines the plain data that flows between the transport,
//! the entity model and the renderer:
//! - [`Record`] — a JSON object, the local copy of one remote entity
//! - [`RecordId`] — the identifier stored in a record's `id` field
//! - [`Params`] — query parameters sent with collection fetches
//!
//! Nothing here performs I/O.

mod ids;
mod record;

pub use ids::RecordId;
pub use record::{is_truthy, merge_params, Params, Record, ID_FIELD};
