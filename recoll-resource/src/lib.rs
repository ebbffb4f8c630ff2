//! Remote CRUD transport for recoll.
//!
//! The entity model never talks to the network directly. It goes through a
//! [`RemoteResource`], handed to it explicitly by the caller:
//! - [`HttpResource`] — REST over HTTP (`GET`/`POST`/`PUT`/`DELETE` on `base/:id`)
//! - [`mock::MockResource`] — in-memory backend with controllable settlement,
//!   for tests and offline use
//!
//! # Example
//!
//! ```
//! use recoll_resource::{HttpResource, HttpResourceConfig, ResourcePath};
//!
//! let config = HttpResourceConfig {
//!     base_url: "https://api.example.com".to_string(),
//!     ..Default::default()
//! };
//! let resource = HttpResource::new(config).unwrap();
//! assert_eq!(resource.base_url(), "https://api.example.com");
//!
//! let path = ResourcePath::new("/todos");
//! assert_eq!(path.collection(), "todos");
//! ```

mod error;
mod http;
pub mod mock;
mod path;
mod resource;

pub use error::{ResourceError, ResourceResult};
pub use http::{HttpResource, HttpResourceConfig};
pub use path::ResourcePath;
pub use resource::{Operation, RemoteResource};
