//! Image conversion module
//!
//! - Type detection from file content (detect)
//! - Backend trait and pixel preparation (backend)
//! - Encoder backends (libwebp, image_rs)
//! - Backend selection and file conversion (codec)

pub mod backend;
pub mod codec;
pub mod detect;
pub mod image_rs;
#[cfg(feature = "libwebp")]
pub mod libwebp;

pub use backend::{prepare_pixels, CodecBackend};
pub use codec::{Codec, NotConvertible};
pub use detect::detect_image_format;
pub use image_rs::ImageRsBackend;
#[cfg(feature = "libwebp")]
pub use libwebp::LibWebpBackend;
