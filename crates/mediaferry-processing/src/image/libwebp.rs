use image::{DynamicImage, GenericImageView, ImageFormat};

use super::backend::CodecBackend;

/// Lossy WebP through libwebp (the `webp` crate).
///
/// The fast in-process path; handles the baseline formats only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibWebpBackend;

impl CodecBackend for LibWebpBackend {
    fn name(&self) -> &'static str {
        "libwebp"
    }

    fn supports(&self, format: ImageFormat) -> bool {
        matches!(format, ImageFormat::Jpeg | ImageFormat::Png)
    }

    fn encode(&self, image: &DynamicImage, quality: f32) -> Result<Vec<u8>, String> {
        let (width, height) = image.dimensions();

        let encoded = match image {
            DynamicImage::ImageRgba8(rgba) => {
                webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, quality)
            }
            DynamicImage::ImageRgb8(rgb) => {
                webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, quality)
            }
            other => {
                return Err(format!(
                    "unsupported pixel layout {:?}; expected RGB8 or RGBA8",
                    other.color()
                ))
            }
        };

        encoded
            .map(|memory| memory.to_vec())
            .map_err(|e| format!("libwebp encoding failed: {:?}", e))
    }
}
