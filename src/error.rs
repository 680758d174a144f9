//! Error types shared by the stack and object handles

/// Boxed source error returned by a provider SDK call
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything a handle or service operation can fail with
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend rejected or could not service a request
    #[error("request failed: {0}")]
    Request(#[source] BoxError),

    /// A stack lookup matched nothing
    #[error("no stack matches {0:?}")]
    NotFound(String),

    /// A lookup that expects exactly one result received several
    #[error("Received {received} stacks, expected one")]
    Ambiguous { received: usize },

    /// A bounded wait ran out of attempts
    #[error("timed out after {attempts} attempts")]
    Timeout { attempts: u32 },

    /// `copy_from` copied the object but the follow-up reload failed
    #[error("object copied but reload failed: {0}")]
    CopiedButReloadFailed(#[source] Box<Error>),
}

impl Error {
    /// Wrap a provider error as [`Error::Request`]
    pub fn request(err: impl Into<BoxError>) -> Self {
        Error::Request(err.into())
    }

    /// True for [`Error::Timeout`]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}

/// Reasons an object destination string cannot be used
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("destination {0:?} is not of the form bucket/key")]
    MissingSeparator(String),

    #[error("destination {0:?} has an empty bucket name")]
    EmptyBucket(String),

    #[error("destination {0:?} has an empty key")]
    EmptyKey(String),

    #[error("destination {0:?} is not an S3 URL")]
    UnsupportedUrl(String),
}

impl From<LocationError> for Error {
    fn from(err: LocationError) -> Self {
        Error::request(err)
    }
}
