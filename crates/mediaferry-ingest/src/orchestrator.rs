//! Ingestion orchestrator
//!
//! Runs the per-attachment pipeline: convert the original to WebP, repoint the
//! attachment at the converted file, upload whatever file is current and drop
//! the local copy. Every per-file failure is logged and absorbed here; the host
//! always gets usable metadata back.

use mediaferry_core::{
    Attachment, AttachmentHost, AttachmentId, AttachmentMetadata, ErrorMetadata, IngestError,
    LogLevel,
};
use mediaferry_processing::Codec;
use mediaferry_storage::{MediaRoot, ObjectStoreGateway, UploadOutcome};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What happened to one attachment during [`IngestOrchestrator::on_metadata_generated`].
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub attachment_id: AttachmentId,
    /// New object key when the original was replaced by a converted file.
    pub converted_key: Option<String>,
    /// `None` when the pipeline stopped before an upload was attempted.
    pub upload: Option<UploadOutcome>,
}

#[derive(Clone)]
pub struct IngestOrchestrator {
    host: Arc<dyn AttachmentHost>,
    codec: Arc<Codec>,
    gateway: ObjectStoreGateway,
    media_root: MediaRoot,
}

impl IngestOrchestrator {
    pub fn new(
        host: Arc<dyn AttachmentHost>,
        codec: Arc<Codec>,
        gateway: ObjectStoreGateway,
        media_root: MediaRoot,
    ) -> Self {
        Self {
            host,
            codec,
            gateway,
            media_root,
        }
    }

    /// Handle the host's "metadata generated" event.
    ///
    /// Returns the metadata the host should persist. On any failure this is the
    /// input as far as it was modified; there is no rollback.
    pub async fn on_metadata_generated(
        &self,
        attachment_id: AttachmentId,
        metadata: AttachmentMetadata,
    ) -> AttachmentMetadata {
        self.ingest(attachment_id, metadata).await.0
    }

    /// Same as [`on_metadata_generated`](Self::on_metadata_generated), also reporting what was done.
    pub async fn ingest(
        &self,
        attachment_id: AttachmentId,
        mut metadata: AttachmentMetadata,
    ) -> (AttachmentMetadata, IngestReport) {
        let mut report = IngestReport {
            attachment_id,
            converted_key: None,
            upload: None,
        };

        let attachment = match self.resolve(attachment_id).await {
            Ok(attachment) => attachment,
            Err(e) => {
                log_ingest_error(attachment_id, &e);
                return (metadata, report);
            }
        };

        let mut current_path = attachment.local_path.clone();
        let mut current_key = attachment.relative_path.clone();
        let mut content_type = attachment.mime_type.clone();

        if attachment.is_image() {
            match self.convert(&attachment).await {
                Ok((converted_path, new_key)) => {
                    let target_mime = self.codec.target().to_mime_type();

                    metadata.file = new_key.clone();
                    metadata.sizes.clear();

                    if let Err(e) = self
                        .host
                        .update_attached_file(attachment_id, &new_key, target_mime)
                        .await
                    {
                        tracing::warn!(
                            error = %e,
                            attachment_id = %attachment_id,
                            key = %new_key,
                            "Failed to record converted file on attachment"
                        );
                    }

                    current_path = converted_path;
                    current_key = new_key.clone();
                    content_type = target_mime.to_string();
                    report.converted_key = Some(new_key);
                }
                Err(e) => log_ingest_error(attachment_id, &e),
            }
        }

        let key = match self.media_root.relative_key(&current_path) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    attachment_id = %attachment_id,
                    path = %current_path.display(),
                    fallback_key = %current_key,
                    "Could not derive object key from path, using stored relative path"
                );
                current_key
            }
        };

        let outcome = self
            .gateway
            .upload(&current_path, &key, Some(content_type.as_str()))
            .await;
        if let Some(e) = outcome.as_ingest_error() {
            log_ingest_error(attachment_id, &e);
        }
        report.upload = Some(outcome);

        (metadata, report)
    }

    /// Handle the host's "attachment created" event.
    ///
    /// Uploads the file if it is still on disk. Images already handled by the
    /// metadata path have no local file left and come back as `Skipped`.
    pub async fn on_attachment_created(&self, attachment_id: AttachmentId) -> Option<UploadOutcome> {
        let attachment = match self.resolve(attachment_id).await {
            Ok(attachment) => attachment,
            Err(e) => {
                log_ingest_error(attachment_id, &e);
                return None;
            }
        };

        let key = match self.media_root.relative_key(&attachment.local_path) {
            Ok(key) => key,
            Err(_) if !attachment.local_path.exists() => attachment.relative_path.clone(),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    attachment_id = %attachment_id,
                    path = %attachment.local_path.display(),
                    "Could not derive object key from path, using stored relative path"
                );
                attachment.relative_path.clone()
            }
        };

        let outcome = self
            .gateway
            .upload(&attachment.local_path, &key, Some(attachment.mime_type.as_str()))
            .await;
        if let Some(e) = outcome.as_ingest_error() {
            log_ingest_error(attachment_id, &e);
        }
        Some(outcome)
    }

    async fn resolve(&self, attachment_id: AttachmentId) -> Result<Attachment, IngestError> {
        self.host
            .attachment(attachment_id)
            .await?
            .ok_or_else(|| IngestError::Host(format!("attachment {} not found", attachment_id)))
    }

    /// Convert the original and swap it out. On success the original is gone and
    /// the returned path and key point at the converted file.
    async fn convert(&self, attachment: &Attachment) -> Result<(PathBuf, String), IngestError> {
        let codec = self.codec.clone();
        let source = attachment.local_path.clone();

        let converted = tokio::task::spawn_blocking(move || codec.convert(&source))
            .await
            .map_err(|e| IngestError::ConversionBackendFailure {
                backend: "spawn_blocking".to_string(),
                message: e.to_string(),
            })?
            .map_err(IngestError::from)?;

        let new_key = match self.media_root.relative_key(&converted) {
            Ok(key) => key,
            Err(e) => {
                remove_file_logged(attachment.id, &converted).await;
                return Err(e.into_ingest_error(&converted.display().to_string()));
            }
        };

        remove_file_logged(attachment.id, &attachment.local_path).await;

        tracing::info!(
            attachment_id = %attachment.id,
            original = %attachment.relative_path,
            key = %new_key,
            "Replaced original with converted image"
        );
        Ok((converted, new_key))
    }
}

async fn remove_file_logged(attachment_id: AttachmentId, path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            error = %e,
            attachment_id = %attachment_id,
            path = %path.display(),
            "Failed to delete local file"
        ),
    }
}

/// Log an absorbed per-file error at its taxonomy level.
pub fn log_ingest_error(attachment_id: AttachmentId, error: &IngestError) {
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(
            attachment_id = %attachment_id,
            code = error.error_code(),
            recoverable = error.is_recoverable(),
            error = %error,
            "Ingestion step skipped"
        ),
        LogLevel::Warn => tracing::warn!(
            attachment_id = %attachment_id,
            code = error.error_code(),
            recoverable = error.is_recoverable(),
            error = %error,
            "Ingestion step failed"
        ),
        LogLevel::Error => tracing::error!(
            attachment_id = %attachment_id,
            code = error.error_code(),
            recoverable = error.is_recoverable(),
            error = %error,
            "Ingestion step failed"
        ),
    }
}
