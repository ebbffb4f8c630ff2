//! The remote resource abstraction.
//!
//! Lets the entity model work against any backend that can fetch, create,
//! update and delete plain records.

use crate::error::ResourceResult;
use crate::path::ResourcePath;
use async_trait::async_trait;
use recoll_types::{Params, Record, RecordId};
use std::fmt;

/// A CRUD backend for plain records.
///
/// Every call is a suspension point; callers may have several in flight at
/// once and must not assume they settle in issue order.
#[async_trait]
pub trait RemoteResource: Send + Sync {
    /// Fetches a single record (`GET base/:id`).
    async fn fetch_one(&self, path: &ResourcePath, id: &RecordId) -> ResourceResult<Record>;

    /// Fetches every record matching `params` (`GET base?params`).
    async fn fetch_many(&self, path: &ResourcePath, params: &Params)
        -> ResourceResult<Vec<Record>>;

    /// Creates a record; the response carries server-assigned fields (`POST base`).
    async fn create(&self, path: &ResourcePath, record: &Record) -> ResourceResult<Record>;

    /// Replaces an existing record (`PUT base/:id`).
    async fn update(
        &self,
        path: &ResourcePath,
        id: &RecordId,
        record: &Record,
    ) -> ResourceResult<Record>;

    /// Deletes the record identified by `record`'s id (`DELETE base/:id`).
    async fn delete(&self, path: &ResourcePath, record: &Record) -> ResourceResult<Record>;
}

/// The kind of remote operation, used in logs and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchOne,
    FetchMany,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::FetchOne => "fetch",
            Operation::FetchMany => "query",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}
