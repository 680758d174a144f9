//! S3 object handles
//!
//! - [`service::ObjectService`] - creates object handles
//! - [`object::Object`] - get/put/delete/copy/wait on one object
//! - [`client::ObjectBackend`] - the requests an object needs, implemented
//!   by [`client::S3Client`]
//! - [`types`] - object metadata and destination parsing

pub mod client;
pub mod object;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

// Re-export commonly used types
pub use client::{ObjectBackend, S3Client};
pub use object::Object;
pub use service::ObjectService;
pub use types::{ObjectLocation, ObjectMetadata};
