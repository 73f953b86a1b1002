//! Mediaferry Ingest Library
//!
//! Offloads host media to an S3-compatible bucket. New uploads are converted to
//! WebP, pushed to the bucket and removed from local disk; reads of attachment
//! URLs are rewritten to the bucket.
//!
//! Hosts call [`activate`] once, then forward their events to
//! [`MediaOffload::dispatch`] and their URL reads to [`MediaOffload::attachment_url`].

pub mod activation;
pub mod events;
pub mod orchestrator;
pub mod rewriter;

// Re-export commonly used types
pub use activation::{activate, activate_from_env, ActivationError, MediaOffload};
pub use events::{ClientAttachment, ClientSize, HostEvent, HostReply};
pub use orchestrator::{IngestOrchestrator, IngestReport};
pub use rewriter::UrlRewriter;

pub use mediaferry_core::{Attachment, AttachmentHost, AttachmentId, AttachmentMetadata, OffloadConfig};
pub use mediaferry_processing::Codec;
pub use mediaferry_storage::{MediaRoot, MemoryStorage, ObjectStorage, UploadOutcome};
