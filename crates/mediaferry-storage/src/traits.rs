//! Storage abstraction trait
//!
//! This module defines the object storage capability the gateway depends on.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object storage abstraction
///
/// One bucket, two capabilities: put an object, and compute where it can be
/// fetched publicly. Implementations are constructed once and shared.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` under `key` in a single request.
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    /// Public URL for `key`. Pure; no network call.
    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url(), key.trim_start_matches('/'))
    }

    /// URL prefix every object key is appended to, without a trailing slash.
    fn public_base_url(&self) -> String;

    /// Bucket name, for logging.
    fn bucket(&self) -> &str;
}
