//! Encoder backend abstraction
//!
//! A codec holds an ordered list of backends. For each file it picks the first
//! backend that is available on this host *and* supports the detected input type,
//! so an installed backend that cannot handle a format never swallows the file.

use image::{DynamicImage, ImageFormat};

/// An interchangeable image-encoding capability.
pub trait CodecBackend: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether the backend can run on this host at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Whether the backend accepts sources of this type.
    fn supports(&self, format: ImageFormat) -> bool;

    /// Encode prepared pixels (RGB8 or RGBA8, see [`prepare_pixels`]) at `quality` (0-100).
    fn encode(&self, image: &DynamicImage, quality: f32) -> Result<Vec<u8>, String>;
}

/// Normalise decoded pixels before encoding.
///
/// Indexed sources arrive from the decoder already expanded to full colour; any
/// source with an alpha channel (including palette PNGs with a `tRNS` chunk) is
/// kept as RGBA8 so transparent regions stay transparent. Everything else is RGB8.
pub fn prepare_pixels(image: DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(image.into_rgba8())
    } else {
        DynamicImage::ImageRgb8(image.into_rgb8())
    }
}
