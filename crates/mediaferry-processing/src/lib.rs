//! Mediaferry Processing Library
//!
//! Converts uploaded raster images to WebP before they are offloaded.
//! Encoding is done by interchangeable backends; see [`image::Codec`].

pub mod compression;
pub mod image;

// Re-export commonly used types
pub use compression::{clamp_quality, TargetFormat};
pub use crate::image::{Codec, CodecBackend, ImageRsBackend, NotConvertible};
#[cfg(feature = "libwebp")]
pub use crate::image::LibWebpBackend;
