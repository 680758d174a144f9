//! S3 object resource handle

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::s3::client::ObjectBackend;
use crate::s3::types::{ObjectLocation, ObjectMetadata};
use crate::wait::WaitPolicy;

/// An S3 object addressed by bucket and key.
///
/// Metadata is `None` until [`Object::load`] succeeds. Nothing on the handle
/// tracks later changes to the remote object.
#[derive(Clone)]
pub struct Object {
    backend: Arc<dyn ObjectBackend>,
    bucket_name: String,
    key: String,
    metadata: Option<ObjectMetadata>,
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("bucket_name", &self.bucket_name)
            .field("key", &self.key)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl Object {
    pub(crate) fn new(
        backend: Arc<dyn ObjectBackend>,
        bucket_name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            bucket_name: bucket_name.into(),
            key: key.into(),
            metadata: None,
        }
    }

    /// Name of the bucket the object lives in
    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    /// Object key within the bucket
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Bucket and key as an [`ObjectLocation`]
    pub fn location(&self) -> ObjectLocation {
        ObjectLocation::new(self.bucket_name.clone(), self.key.clone())
    }

    /// Metadata from the last successful load
    pub fn metadata(&self) -> Option<&ObjectMetadata> {
        self.metadata.as_ref()
    }

    /// Whether a load has succeeded at least once
    pub fn is_loaded(&self) -> bool {
        self.metadata.is_some()
    }

    /// Fetch metadata with a HEAD request.
    ///
    /// The previous metadata is kept if the request fails.
    pub async fn load(&mut self) -> Result<()> {
        let metadata = self
            .backend
            .head_object(&self.bucket_name, &self.key)
            .await?;
        self.metadata = Some(metadata);
        Ok(())
    }

    /// Same as [`Object::load`]
    pub async fn reload(&mut self) -> Result<()> {
        self.load().await
    }

    /// Stream the object's content. The caller owns the stream.
    pub async fn get(&self) -> Result<ByteStream> {
        self.backend.get_object(&self.bucket_name, &self.key).await
    }

    /// Download the whole object into memory
    pub async fn get_bytes(&self) -> Result<Bytes> {
        let data = self.get().await?.collect().await.map_err(Error::request)?;
        Ok(data.into_bytes())
    }

    /// Replace the object's content. Metadata is not reloaded.
    ///
    /// Use `ByteStream::from_path` for file-backed bodies the SDK can rewind
    /// on retry.
    pub async fn put(&self, body: ByteStream) -> Result<()> {
        self.backend
            .put_object(&self.bucket_name, &self.key, body)
            .await
    }

    /// Upload an in-memory buffer as the object's content
    pub async fn put_bytes(&self, data: impl Into<Bytes>) -> Result<()> {
        self.put(ByteStream::from(data.into())).await
    }

    /// Delete the remote object. Local metadata is kept.
    pub async fn delete(&self) -> Result<()> {
        self.backend
            .delete_object(&self.bucket_name, &self.key)
            .await
    }

    /// Server-side copy of this object to `destination` (`bucket/key`).
    ///
    /// The returned handle addresses this same bucket/key, not the
    /// destination, and has no metadata loaded. Build a handle for the copy
    /// with [`ObjectService::object`](crate::s3::ObjectService::object).
    /// A destination without a `/` fails before any request is made.
    pub async fn copy(&self, destination: &str) -> Result<Object> {
        let destination = ObjectLocation::parse(destination)?;

        self.backend
            .copy_object(&self.location(), &destination)
            .await?;

        Ok(Object::new(
            self.backend.clone(),
            self.bucket_name.clone(),
            self.key.clone(),
        ))
    }

    /// Server-side copy of `source` onto this object, then reload.
    ///
    /// If the copy succeeds but the reload fails the error is
    /// [`Error::CopiedButReloadFailed`]; the copy is not undone.
    pub async fn copy_from(&mut self, source: &Object) -> Result<()> {
        self.backend
            .copy_object(&source.location(), &self.location())
            .await?;

        self.reload()
            .await
            .map_err(|e| Error::CopiedButReloadFailed(Box::new(e)))
    }

    /// HEAD every 5 seconds, at most 20 times, until the object exists
    pub async fn wait_until_exists(&mut self) -> Result<()> {
        self.wait_until_exists_with(WaitPolicy::object()).await
    }

    /// Wait for the object to exist; the successful HEAD becomes the
    /// loaded metadata
    pub async fn wait_until_exists_with(&mut self, policy: WaitPolicy) -> Result<()> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            if let Ok(metadata) = self
                .backend
                .head_object(&self.bucket_name, &self.key)
                .await
            {
                tracing::debug!(
                    "{}/{} exists after {} attempt(s)",
                    self.bucket_name,
                    self.key,
                    attempts
                );
                self.metadata = Some(metadata);
                return Ok(());
            }
            policy.pause(attempts).await?;
        }
    }

    /// HEAD every 5 seconds, at most 20 times, until the object is gone
    pub async fn wait_until_not_exists(&self) -> Result<()> {
        self.wait_until_not_exists_with(WaitPolicy::object()).await
    }

    /// Wait for a HEAD request to fail. Any failure counts as "gone".
    pub async fn wait_until_not_exists_with(&self, policy: WaitPolicy) -> Result<()> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            if self
                .backend
                .head_object(&self.bucket_name, &self.key)
                .await
                .is_err()
            {
                tracing::debug!(
                    "{}/{} gone after {} attempt(s)",
                    self.bucket_name,
                    self.key,
                    attempts
                );
                return Ok(());
            }
            policy.pause(attempts).await?;
        }
    }
}
