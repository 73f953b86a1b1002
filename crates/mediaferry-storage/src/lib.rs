//! Mediaferry Storage Library
//!
//! This crate provides the object store gateway: the `ObjectStorage` capability
//! ("put object", "public URL"), an S3 implementation on `object_store`, an
//! in-memory implementation, and the upload-then-delete gateway used by ingestion.
//!
//! # Object key format
//!
//! The object key of a file is its path relative to the host's media root
//! (`2024/photo.webp`). Keys must not contain `..` segments or a leading `/`.
//! Key derivation is centralized in the `keys` module.

pub mod content_type;
pub mod factory;
pub mod gateway;
pub mod keys;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use content_type::detect_content_type;
pub use factory::create_storage;
pub use gateway::{ObjectStoreGateway, UploadOutcome};
pub use keys::{public_base_url, MediaRoot};
pub use memory::{MemoryStorage, StoredObject};
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
