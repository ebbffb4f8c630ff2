//! Resource addressing.

use recoll_types::RecordId;
use std::fmt;

/// Base path of a remote resource, e.g. `todos` for `/todos/:id`.
///
/// One leading `/` is stripped on construction so `"/todos"` and `"todos"`
/// address the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath(String);

impl ResourcePath {
    /// Normalises `base`, dropping one leading `/`.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        match base.strip_prefix('/') {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(base),
        }
    }

    /// Path of the collection endpoint.
    pub fn collection(&self) -> &str {
        &self.0
    }

    /// Path of a single record: `base/:id`.
    ///
    /// The id is percent-encoded so it always stays one path segment.
    pub fn item(&self, id: &RecordId) -> String {
        format!("{}/{}", self.0, urlencoding::encode(&id.to_string()))
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourcePath {
    fn from(base: &str) -> Self {
        Self::new(base)
    }
}

impl From<String> for ResourcePath {
    fn from(base: String) -> Self {
        Self::new(base)
    }
}
