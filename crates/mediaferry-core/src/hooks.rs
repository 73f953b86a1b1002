//! Host integration traits
//!
//! The pipeline never owns attachment records. The host (the content-management
//! system that fires upload events) implements [`AttachmentHost`] so the pipeline
//! can look attachments up and write back the one field it changes.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Attachment, AttachmentId};

/// Attachment lookups and writes provided by the host.
#[async_trait]
pub trait AttachmentHost: Send + Sync {
    /// Resolve an attachment by id. `None` when the host has no such record.
    async fn attachment(&self, id: AttachmentId) -> Result<Option<Attachment>>;

    /// Point the attachment's stored file at a new relative key (after conversion).
    async fn update_attached_file(
        &self,
        id: AttachmentId,
        relative_path: &str,
        mime_type: &str,
    ) -> Result<()>;
}
