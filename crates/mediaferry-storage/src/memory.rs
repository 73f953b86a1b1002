//! In-process object storage
//!
//! Keeps objects in a map. Used as the fake store in tests and by hosts that want
//! to dry-run the pipeline without a bucket.

use crate::traits::{ObjectStorage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// An object as recorded by [`MemoryStorage`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Map-backed object storage
#[derive(Clone)]
pub struct MemoryStorage {
    bucket: String,
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    fail_uploads: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Arc::new(Mutex::new(HashMap::new())),
            fail_uploads: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent put fail as if the network dropped.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Sorted keys currently stored.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredObject>> {
        // A poisoned map only means a test panicked mid-insert; the data is still usable.
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(format!(
                "simulated transport failure for {}",
                key
            )));
        }

        self.lock().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        tracing::debug!(bucket = %self.bucket, key = %key, "Memory storage put");
        Ok(())
    }

    fn public_base_url(&self) -> String {
        crate::keys::public_base_url(&self.bucket, None)
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let storage = MemoryStorage::new("mybucket");
        storage
            .put_object("2024/a.txt", Bytes::from_static(b"hello"), "text/plain")
            .await
            .unwrap();

        let object = storage.get("2024/a.txt").unwrap();
        assert_eq!(object.data, Bytes::from_static(b"hello"));
        assert_eq!(object.content_type, "text/plain");
        assert_eq!(storage.keys(), vec!["2024/a.txt".to_string()]);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let storage = MemoryStorage::new("mybucket");
        storage.set_fail_uploads(true);
        let result = storage
            .put_object("2024/a.txt", Bytes::from_static(b"hello"), "text/plain")
            .await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert!(!storage.contains("2024/a.txt"));
    }

    #[test]
    fn test_public_url_matches_s3_layout() {
        let storage = MemoryStorage::new("mybucket");
        assert_eq!(
            storage.public_url("2024/a.webp"),
            "https://mybucket.s3.amazonaws.com/2024/a.webp"
        );
    }
}
