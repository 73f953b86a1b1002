//! Object store gateway
//!
//! Moves one local file into the bucket and reclaims the disk space it used. The
//! put and the local delete are a single unit of work: the local copy is removed
//! whether or not the put succeeded, and a failed delete never undoes a put.

use bytes::Bytes;
use mediaferry_core::IngestError;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

use crate::content_type::detect_content_type;
use crate::keys::validate_key;
use crate::traits::{ObjectStorage, StorageError};

/// Result of one [`ObjectStoreGateway::upload`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    /// The object is now remote.
    Uploaded {
        key: String,
        url: String,
        content_type: String,
        size_bytes: u64,
        local_removed: bool,
    },
    /// The put did not happen. The local file was still removed when possible.
    Failed {
        key: String,
        error: String,
        local_removed: bool,
    },
    /// There was no local file to upload; treated as already handled.
    Skipped { key: String },
}

impl UploadOutcome {
    pub fn key(&self) -> &str {
        match self {
            UploadOutcome::Uploaded { key, .. }
            | UploadOutcome::Failed { key, .. }
            | UploadOutcome::Skipped { key } => key,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded { .. })
    }

    /// The taxonomy entry for outcomes that are not a clean upload.
    pub fn as_ingest_error(&self) -> Option<IngestError> {
        match self {
            UploadOutcome::Uploaded { .. } => None,
            UploadOutcome::Failed { key, error, .. } => Some(IngestError::UploadTransportFailure {
                key: key.clone(),
                message: error.clone(),
            }),
            UploadOutcome::Skipped { key } => Some(IngestError::LocalFileMissing(key.clone())),
        }
    }
}

impl StorageError {
    /// Classify a storage failure for the object or path it concerned.
    pub fn into_ingest_error(self, key: &str) -> IngestError {
        match self {
            StorageError::UploadFailed(message) => IngestError::UploadTransportFailure {
                key: key.to_string(),
                message,
            },
            other => IngestError::Host(format!("{}: {}", key, other)),
        }
    }
}

/// Upload-then-delete front for an [`ObjectStorage`].
#[derive(Clone)]
pub struct ObjectStoreGateway {
    storage: Arc<dyn ObjectStorage>,
}

impl ObjectStoreGateway {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    pub fn public_url(&self, key: &str) -> String {
        self.storage.public_url(key)
    }

    /// Upload the file at `local_path` as `key`, then delete the local file.
    ///
    /// The content type is detected from the file itself; `content_type_hint` is
    /// only used when inspection finds nothing. A missing local file is a no-op
    /// returning [`UploadOutcome::Skipped`]. Failures are logged, never retried.
    pub async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type_hint: Option<&str>,
    ) -> UploadOutcome {
        if let Err(e) = validate_key(key) {
            tracing::error!(
                error = %e,
                path = %local_path.display(),
                "Refusing to upload with an invalid object key; local file kept"
            );
            return UploadOutcome::Failed {
                key: key.to_string(),
                error: e.to_string(),
                local_removed: false,
            };
        }

        let data = match fs::read(local_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %local_path.display(),
                    key = %key,
                    "Local file already gone, skipping upload"
                );
                return UploadOutcome::Skipped {
                    key: key.to_string(),
                };
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    path = %local_path.display(),
                    key = %key,
                    "Failed to read local file for upload"
                );
                let local_removed = self.remove_local(local_path).await;
                return UploadOutcome::Failed {
                    key: key.to_string(),
                    error: StorageError::IoError(e).to_string(),
                    local_removed,
                };
            }
        };

        let size_bytes = data.len() as u64;
        let content_type = detect_content_type(local_path, &data, content_type_hint);
        let start = std::time::Instant::now();

        let result = self
            .storage
            .put_object(key, Bytes::from(data), &content_type)
            .await;

        let local_removed = self.remove_local(local_path).await;

        match result {
            Ok(()) => {
                let url = self.storage.public_url(key);
                tracing::info!(
                    bucket = %self.storage.bucket(),
                    key = %key,
                    content_type = %content_type,
                    size_bytes = size_bytes,
                    local_removed = local_removed,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Offloaded local file to object storage"
                );
                UploadOutcome::Uploaded {
                    key: key.to_string(),
                    url,
                    content_type,
                    size_bytes,
                    local_removed,
                }
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.storage.bucket(),
                    key = %key,
                    size_bytes = size_bytes,
                    local_removed = local_removed,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Upload to object storage failed; not retrying"
                );
                UploadOutcome::Failed {
                    key: key.to_string(),
                    error: e.to_string(),
                    local_removed,
                }
            }
        }
    }

    /// Best-effort delete of the local copy.
    async fn remove_local(&self, local_path: &Path) -> bool {
        match fs::remove_file(local_path).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %local_path.display(),
                    "Failed to delete local file after upload"
                );
                false
            }
        }
    }
}
