//! Object store seam.
//!
//! The handler persists converted documents through the [`ObjectStore`]
//! trait. Production code uses the S3-backed implementation from
//! `xmlintake-s3`; [`InMemoryObjectStore`] is a thread-safe in-process
//! implementation that behaves like a single S3 account (quoted MD5 ETags,
//! last write wins).

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use md5::{Digest, Md5};
use tracing::debug;

/// Composite key identifying a stored object: `(bucket, key)`.
type ObjectId = (String, String);

/// A document ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObject {
    /// Destination bucket.
    pub bucket: String,
    /// Object key (`[sid/]<id>.json`).
    pub key: String,
    /// JSON text of the converted document.
    pub body: Bytes,
}

/// What the store reports for a successful write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutObjectOutput {
    /// Entity tag of the written object.
    pub e_tag: Option<String>,
    /// Version ID, when the bucket is versioned.
    pub version_id: Option<String>,
}

/// A failed write, carrying the store's own error unchanged.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    code: Option<String>,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl StoreError {
    /// Create an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the store's error code (e.g. `AccessDenied`).
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the underlying client error.
    #[must_use]
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The store's error code, if it reported one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The store's error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Durable bucket + key addressed blob storage.
#[async_trait]
pub trait ObjectStore: Send + Sync + fmt::Debug {
    /// Write `object`, replacing any existing object at the same key.
    async fn put_object(&self, object: StorageObject) -> Result<PutObjectOutput, StoreError>;
}

/// In-process [`ObjectStore`] backed by a [`DashMap`].
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: DashMap<ObjectId, Bytes>,
}

impl InMemoryObjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the body stored at `(bucket, key)`.
    #[must_use]
    pub fn get(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .get(&(bucket.to_owned(), key.to_owned()))
            .map(|entry| entry.value().clone())
    }

    /// Number of stored objects across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Sorted keys stored in `bucket`.
    #[must_use]
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .iter()
            .filter(|entry| entry.key().0 == bucket)
            .map(|entry| entry.key().1.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put_object(&self, object: StorageObject) -> Result<PutObjectOutput, StoreError> {
        let etag = format!("\"{}\"", hex::encode(Md5::digest(&object.body)));
        debug!(
            bucket = %object.bucket,
            key = %object.key,
            size = object.body.len(),
            "storing object in memory"
        );
        self.objects.insert((object.bucket, object.key), object.body);
        Ok(PutObjectOutput {
            e_tag: Some(etag),
            version_id: None,
        })
    }
}
