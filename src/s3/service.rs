//! Entry point for S3 objects

use aws_config::SdkConfig;
use std::fmt;
use std::sync::Arc;

use crate::s3::client::{ObjectBackend, S3Client};
use crate::s3::object::Object;

/// Hands out [`Object`] handles that all share one client
#[derive(Clone)]
pub struct ObjectService {
    backend: Arc<dyn ObjectBackend>,
}

impl fmt::Debug for ObjectService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectService").finish_non_exhaustive()
    }
}

impl ObjectService {
    /// Service over any object backend
    pub fn new(backend: Arc<dyn ObjectBackend>) -> Self {
        Self { backend }
    }

    /// Service backed by an S3 client built from `config`
    pub fn from_conf(config: &SdkConfig, force_path_style: bool) -> Self {
        Self::new(Arc::new(S3Client::from_conf(config, force_path_style)))
    }

    /// Handle for `bucket`/`key` with no metadata loaded. Makes no request.
    pub fn object(&self, bucket: impl Into<String>, key: impl Into<String>) -> Object {
        Object::new(self.backend.clone(), bucket, key)
    }
}
