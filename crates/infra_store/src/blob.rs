//! In-memory blob store
//!
//! Mirrors the object-storage service used in production closely enough for
//! tests: blobs live under string keys, URLs are derived from bucket + key,
//! and download URLs carry an expiry query parameter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use core_kernel::{BlobStore, PortError};

#[derive(Debug, Clone)]
struct StoredBlob {
    bytes: Vec<u8>,
    content_type: String,
    metadata: HashMap<String, String>,
}

/// In-memory `BlobStore` implementation.
#[derive(Debug)]
pub struct MemoryBlobStore {
    bucket: String,
    objects: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryBlobStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    fn base_url(&self) -> String {
        format!("https://{}.s3.ap-south-1.amazonaws.com", self.bucket)
    }

    /// Returns true when a blob exists under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.objects.read().map(|o| o.contains_key(key)).unwrap_or(false)
    }

    /// Returns the stored byte length of `key`, if present
    pub fn size_of(&self, key: &str) -> Option<usize> {
        self.objects.read().ok()?.get(key).map(|b| b.bytes.len())
    }

    /// Returns the stored content type of `key`, if present
    pub fn content_type_of(&self, key: &str) -> Option<String> {
        self.objects
            .read()
            .ok()?
            .get(key)
            .map(|b| b.content_type.clone())
    }

    /// Returns the metadata stored with `key`, if present
    pub fn metadata_of(&self, key: &str) -> Option<HashMap<String, String>> {
        self.objects.read().ok()?.get(key).map(|b| b.metadata.clone())
    }

    fn poisoned() -> PortError {
        PortError::storage("blob store lock poisoned")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        metadata: HashMap<String, String>,
    ) -> Result<(), PortError> {
        let mut objects = self.objects.write().map_err(|_| Self::poisoned())?;
        objects.insert(
            key.to_string(),
            StoredBlob {
                bytes,
                content_type: content_type.to_string(),
                metadata,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), PortError> {
        let mut objects = self.objects.write().map_err(|_| Self::poisoned())?;
        objects.remove(key);
        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url(), key)
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&format!("{}/", self.base_url()))
            .map(str::to_string)
    }

    fn download_url(&self, key: &str, ttl_secs: u64) -> String {
        format!("{}/{}?X-Amz-Expires={}", self.base_url(), key, ttl_secs)
    }
}
