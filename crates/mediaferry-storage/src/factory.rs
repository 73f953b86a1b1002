#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{ObjectStorage, StorageError, StorageResult};
use mediaferry_core::OffloadConfig;
use std::sync::Arc;

/// Create the object storage client from configuration.
///
/// Fails with `ConfigError` when credentials are missing; callers decide whether
/// that is fatal (activation treats it as "do not activate").
pub fn create_storage(config: &OffloadConfig) -> StorageResult<Arc<dyn ObjectStorage>> {
    let credentials = config.credentials().ok_or_else(|| {
        StorageError::ConfigError(
            "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must both be set".to_string(),
        )
    })?;

    #[cfg(feature = "storage-s3")]
    {
        let storage = S3Storage::new(
            config.s3_bucket.clone(),
            config.s3_region.clone(),
            config.s3_endpoint.clone(),
            &credentials,
        )?;
        tracing::info!(
            bucket = %config.s3_bucket,
            region = %config.s3_region,
            endpoint = ?config.s3_endpoint,
            "Object storage client created"
        );
        Ok(Arc::new(storage))
    }

    #[cfg(not(feature = "storage-s3"))]
    {
        let _ = credentials;
        Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        ))
    }
}
