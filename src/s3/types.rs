//! S3 data types

use chrono::{DateTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::LocationError;

/// Unreserved characters plus `/`, which separates bucket and key segments
const COPY_SOURCE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Object metadata as returned by a HEAD request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub accept_ranges: Option<String>,
    pub cache_control: Option<String>,
    pub content_disposition: Option<String>,
    pub content_encoding: Option<String>,
    pub content_language: Option<String>,
    pub content_length: Option<i64>,
    pub content_type: Option<String>,
    pub delete_marker: Option<bool>,
    pub etag: Option<String>,
    pub expiration: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    /// User-defined `x-amz-meta-*` headers
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub missing_meta: Option<i32>,
    pub replication_status: Option<String>,
    pub request_charged: Option<String>,
    pub restore: Option<String>,
    pub server_side_encryption: Option<String>,
    pub sse_customer_algorithm: Option<String>,
    pub sse_customer_key_md5: Option<String>,
    pub sse_kms_key_id: Option<String>,
    pub storage_class: Option<String>,
    pub version_id: Option<String>,
    pub website_redirect_location: Option<String>,
}

/// A bucket/key pair parsed from a destination string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse a destination.
    ///
    /// Accepts `bucket/key` (split on the first `/`), `s3://bucket/key`, and
    /// virtual-hosted or path-style `https://` S3 URLs.
    pub fn parse(destination: &str) -> Result<Self, LocationError> {
        if let Some(rest) = destination.strip_prefix("s3://") {
            return Self::split(destination, rest);
        }

        if destination.starts_with("https://") || destination.starts_with("http://") {
            return Self::parse_url(destination);
        }

        Self::split(destination, destination)
    }

    fn split(destination: &str, path: &str) -> Result<Self, LocationError> {
        let (bucket, key) = path
            .split_once('/')
            .ok_or_else(|| LocationError::MissingSeparator(destination.to_string()))?;

        if bucket.is_empty() {
            return Err(LocationError::EmptyBucket(destination.to_string()));
        }
        if key.is_empty() {
            return Err(LocationError::EmptyKey(destination.to_string()));
        }

        Ok(Self::new(bucket, key))
    }

    fn parse_url(destination: &str) -> Result<Self, LocationError> {
        let unsupported = || LocationError::UnsupportedUrl(destination.to_string());
        let parsed = url::Url::parse(destination).map_err(|_| unsupported())?;
        let host = parsed.host_str().ok_or_else(unsupported)?;
        let path = percent_decode_str(parsed.path().trim_start_matches('/'))
            .decode_utf8()
            .map_err(|_| unsupported())?;

        // Virtual-hosted style: bucket.s3.region.amazonaws.com/key
        if host.contains(".s3.") && host.ends_with(".amazonaws.com") {
            let bucket = host.split(".s3.").next().unwrap_or_default();
            return Self::split(destination, &format!("{}/{}", bucket, path));
        }

        // Path style: s3.region.amazonaws.com/bucket/key
        if host.starts_with("s3.") && host.ends_with(".amazonaws.com") {
            return Self::split(destination, &path);
        }

        Err(unsupported())
    }

    /// `bucket/key` URL-encoded, the form S3 expects in `x-amz-copy-source`
    pub fn copy_source(&self) -> String {
        utf8_percent_encode(&format!("{}/{}", self.bucket, self.key), COPY_SOURCE_ENCODE_SET)
            .to_string()
    }

    /// Convert to s3:// URL format
    pub fn to_s3_url(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_destination() {
        let location = ObjectLocation::parse("my-bucket/path/to/file.txt").unwrap();
        assert_eq!(location.bucket, "my-bucket");
        assert_eq!(location.key, "path/to/file.txt");
    }

    #[test]
    fn test_parse_splits_on_first_slash_only() {
        let location = ObjectLocation::parse("bucket/a/b/c/d/e/f.txt").unwrap();
        assert_eq!(location.bucket, "bucket");
        assert_eq!(location.key, "a/b/c/d/e/f.txt");
    }

    #[test]
    fn test_parse_s3_scheme() {
        let location = ObjectLocation::parse("s3://my-bucket/path/to/file.txt").unwrap();
        assert_eq!(location, ObjectLocation::new("my-bucket", "path/to/file.txt"));
    }

    #[test]
    fn test_parse_https_virtual_hosted() {
        let location =
            ObjectLocation::parse("https://my-bucket.s3.eu-west-1.amazonaws.com/path/to/file.txt")
                .unwrap();
        assert_eq!(location, ObjectLocation::new("my-bucket", "path/to/file.txt"));
    }

    #[test]
    fn test_parse_https_path_style() {
        let location =
            ObjectLocation::parse("https://s3.eu-west-1.amazonaws.com/my-bucket/file.txt").unwrap();
        assert_eq!(location, ObjectLocation::new("my-bucket", "file.txt"));
    }

    #[test]
    fn test_parse_missing_separator() {
        assert!(matches!(
            ObjectLocation::parse("bucket-only"),
            Err(LocationError::MissingSeparator(_))
        ));
        assert!(matches!(
            ObjectLocation::parse("s3://bucket-only"),
            Err(LocationError::MissingSeparator(_))
        ));
        assert!(matches!(
            ObjectLocation::parse(""),
            Err(LocationError::MissingSeparator(_))
        ));
    }

    #[test]
    fn test_parse_empty_parts() {
        assert!(matches!(
            ObjectLocation::parse("/key"),
            Err(LocationError::EmptyBucket(_))
        ));
        assert!(matches!(
            ObjectLocation::parse("bucket/"),
            Err(LocationError::EmptyKey(_))
        ));
    }

    #[test]
    fn test_parse_unsupported_url() {
        assert!(matches!(
            ObjectLocation::parse("https://example.com/file.txt"),
            Err(LocationError::UnsupportedUrl(_))
        ));
    }

    #[test]
    fn test_copy_source_and_urls() {
        let location = ObjectLocation::new("test-bucket", "folder/file.txt");
        assert_eq!(location.copy_source(), "test-bucket/folder/file.txt");
        assert_eq!(location.to_s3_url(), "s3://test-bucket/folder/file.txt");
        assert_eq!(location.to_string(), "test-bucket/folder/file.txt");
    }

    #[test]
    fn test_copy_source_encodes_reserved_characters() {
        let location = ObjectLocation::new("bucket", "100% done+final.txt");
        assert_eq!(location.copy_source(), "bucket/100%25%20done%2Bfinal.txt");

        let location = ObjectLocation::new("bucket", "dir/naïve file~v1.txt");
        assert_eq!(location.copy_source(), "bucket/dir/na%C3%AFve%20file~v1.txt");

        // Display stays unencoded
        assert_eq!(location.to_string(), "bucket/dir/naïve file~v1.txt");
    }

    #[test]
    fn test_parse_https_decodes_key() {
        let location =
            ObjectLocation::parse("https://b.s3.us-east-1.amazonaws.com/my%20file.txt").unwrap();
        assert_eq!(location.bucket, "b");
        assert_eq!(location.key, "my file.txt");

        let location =
            ObjectLocation::parse("https://s3.eu-west-1.amazonaws.com/b/100%25%2Bdone.txt").unwrap();
        assert_eq!(location.bucket, "b");
        assert_eq!(location.key, "100%+done.txt");
    }

    #[test]
    fn test_metadata_default_is_empty() {
        let metadata = ObjectMetadata::default();
        assert!(metadata.content_length.is_none());
        assert!(metadata.etag.is_none());
        assert!(metadata.metadata.is_empty());
    }
}
