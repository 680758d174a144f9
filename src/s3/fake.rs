//! In-memory object store for unit tests

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::s3::client::ObjectBackend;
use crate::s3::types::{ObjectLocation, ObjectMetadata};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Head(String),
    Get(String),
    Put(String),
    Delete(String),
    Copy { source: String, destination: String },
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct FakeError(pub String);

fn not_found(bucket: &str, key: &str) -> Error {
    Error::request(FakeError(format!("NotFound: {}/{}", bucket, key)))
}

/// Objects keyed by `bucket/key`; HEAD answers can be overridden per attempt
#[derive(Default)]
pub(crate) struct FakeObjects {
    objects: Mutex<HashMap<String, Bytes>>,
    /// Consumed before falling back to the store: `true` answers with the
    /// stored object, `false` fails
    head_script: Mutex<VecDeque<bool>>,
    reject_copies: Mutex<bool>,
    calls: Mutex<Vec<Call>>,
}

impl FakeObjects {
    pub(crate) fn insert(&self, bucket: &str, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{}/{}", bucket, key), Bytes::copy_from_slice(data));
    }

    pub(crate) fn contents(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{}/{}", bucket, key))
            .cloned()
    }

    pub(crate) fn script_heads(&self, answers: &[bool]) {
        self.head_script.lock().unwrap().extend(answers.iter().copied());
    }

    pub(crate) fn reject_copies(&self) {
        *self.reject_copies.lock().unwrap() = true;
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn head_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Head(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn metadata_for(data: &Bytes) -> ObjectMetadata {
        ObjectMetadata {
            content_length: Some(data.len() as i64),
            content_type: Some("application/octet-stream".to_string()),
            etag: Some(format!("\"{:x}\"", data.len())),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ObjectBackend for FakeObjects {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata> {
        let path = format!("{}/{}", bucket, key);
        self.record(Call::Head(path.clone()));

        let scripted = self.head_script.lock().unwrap().pop_front();
        let stored = self.objects.lock().unwrap().get(&path).cloned();

        match (scripted, stored) {
            (Some(false), _) => Err(not_found(bucket, key)),
            (Some(true), Some(data)) => Ok(Self::metadata_for(&data)),
            (Some(true), None) => Ok(Self::metadata_for(&Bytes::new())),
            (None, Some(data)) => Ok(Self::metadata_for(&data)),
            (None, None) => Err(not_found(bucket, key)),
        }
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream> {
        self.record(Call::Get(format!("{}/{}", bucket, key)));

        self.contents(bucket, key)
            .map(ByteStream::from)
            .ok_or_else(|| not_found(bucket, key))
    }

    async fn put_object(&self, bucket: &str, key: &str, body: ByteStream) -> Result<()> {
        self.record(Call::Put(format!("{}/{}", bucket, key)));

        let data = body.collect().await.map_err(Error::request)?.into_bytes();
        self.insert(bucket, key, &data);
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.record(Call::Delete(format!("{}/{}", bucket, key)));

        self.objects
            .lock()
            .unwrap()
            .remove(&format!("{}/{}", bucket, key));
        Ok(())
    }

    async fn copy_object(
        &self,
        source: &ObjectLocation,
        destination: &ObjectLocation,
    ) -> Result<()> {
        self.record(Call::Copy {
            source: source.to_string(),
            destination: destination.to_string(),
        });

        if *self.reject_copies.lock().unwrap() {
            return Err(Error::request(FakeError("AccessDenied".to_string())));
        }

        let data = self
            .contents(&source.bucket, &source.key)
            .ok_or_else(|| not_found(&source.bucket, &source.key))?;
        self.insert(&destination.bucket, &destination.key, &data);
        Ok(())
    }
}
