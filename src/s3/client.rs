//! AWS S3 client wrapper

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::operation::head_object::HeadObjectOutput;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::s3::types::{ObjectLocation, ObjectMetadata};

/// Requests an [`Object`](crate::s3::Object) needs from the storage service
#[async_trait]
pub trait ObjectBackend: Send + Sync {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream>;

    async fn put_object(&self, bucket: &str, key: &str, body: ByteStream) -> Result<()>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Server-side copy
    async fn copy_object(&self, source: &ObjectLocation, destination: &ObjectLocation)
        -> Result<()>;
}

/// S3 client wrapper
#[derive(Debug, Clone)]
pub struct S3Client {
    client: Client,
    current_region: String,
}

impl S3Client {
    /// Create a client from the shared SDK configuration
    pub fn from_conf(config: &SdkConfig, force_path_style: bool) -> Self {
        let s3_config = aws_sdk_s3::config::Builder::from(config)
            .force_path_style(force_path_style)
            .build();

        let current_region = config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "us-east-1".to_string());

        Self {
            client: Client::from_conf(s3_config),
            current_region,
        }
    }

    /// Create a client straight from a [`ClientConfig`]
    pub async fn with_config(config: &ClientConfig) -> Self {
        let sdk_config = config.sdk_config().await;
        Self::from_conf(&sdk_config, config.force_path_style)
    }

    /// Get the current region
    pub fn region(&self) -> &str {
        &self.current_region
    }
}

fn to_utc(d: &aws_sdk_s3::primitives::DateTime) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::from_timestamp(d.secs(), d.subsec_nanos()).unwrap_or_default()
}

fn owned(s: Option<&str>) -> Option<String> {
    s.map(|s| s.to_string())
}

#[allow(deprecated)]
fn from_head_output(head: &HeadObjectOutput) -> ObjectMetadata {
    ObjectMetadata {
        accept_ranges: owned(head.accept_ranges()),
        cache_control: owned(head.cache_control()),
        content_disposition: owned(head.content_disposition()),
        content_encoding: owned(head.content_encoding()),
        content_language: owned(head.content_language()),
        content_length: head.content_length(),
        content_type: owned(head.content_type()),
        delete_marker: head.delete_marker(),
        etag: owned(head.e_tag()),
        expiration: owned(head.expiration()),
        expires: head.expires().map(to_utc),
        last_modified: head.last_modified().map(to_utc),
        metadata: head.metadata().cloned().unwrap_or_default(),
        missing_meta: head.missing_meta(),
        replication_status: head.replication_status().map(|s| s.as_str().to_string()),
        request_charged: head.request_charged().map(|s| s.as_str().to_string()),
        restore: owned(head.restore()),
        server_side_encryption: head.server_side_encryption().map(|s| s.as_str().to_string()),
        sse_customer_algorithm: owned(head.sse_customer_algorithm()),
        sse_customer_key_md5: owned(head.sse_customer_key_md5()),
        sse_kms_key_id: owned(head.ssekms_key_id()),
        storage_class: head.storage_class().map(|s| s.as_str().to_string()),
        version_id: owned(head.version_id()),
        website_redirect_location: owned(head.website_redirect_location()),
    }
}

#[async_trait]
impl ObjectBackend for S3Client {
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata> {
        tracing::debug!("HeadObject {}/{}", bucket, key);

        let response = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(Error::request)?;

        Ok(from_head_output(&response))
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ByteStream> {
        tracing::debug!("GetObject {}/{}", bucket, key);

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(Error::request)?;

        Ok(response.body)
    }

    async fn put_object(&self, bucket: &str, key: &str, body: ByteStream) -> Result<()> {
        tracing::info!("PutObject {}/{}", bucket, key);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(Error::request)?;

        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        tracing::info!("DeleteObject {}/{}", bucket, key);

        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(Error::request)?;

        Ok(())
    }

    async fn copy_object(
        &self,
        source: &ObjectLocation,
        destination: &ObjectLocation,
    ) -> Result<()> {
        tracing::info!("CopyObject {} -> {}", source, destination);

        self.client
            .copy_object()
            .bucket(&destination.bucket)
            .key(&destination.key)
            .copy_source(source.copy_source())
            .send()
            .await
            .map_err(Error::request)?;

        Ok(())
    }
}
