//! Mediaferry Core Library
//!
//! This crate provides the attachment data model, host integration traits,
//! configuration and error taxonomy shared by all Mediaferry components.

pub mod config;
pub mod constants;
pub mod error;
pub mod hooks;
pub mod models;

// Re-export commonly used types
pub use config::{OffloadConfig, S3Credentials};
pub use error::{ErrorMetadata, IngestError, LogLevel};
pub use hooks::AttachmentHost;
pub use models::{Attachment, AttachmentId, AttachmentMetadata, SizeVariant};
