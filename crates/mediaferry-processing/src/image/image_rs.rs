use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ImageFormat};

use super::backend::CodecBackend;

/// WebP through the pure-Rust `image` encoder.
///
/// Always available, accepts more source types than libwebp, but only writes
/// lossless WebP, so `quality` does not apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsBackend;

impl CodecBackend for ImageRsBackend {
    fn name(&self) -> &'static str {
        "image-rs"
    }

    fn supports(&self, format: ImageFormat) -> bool {
        matches!(
            format,
            ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Bmp
        )
    }

    fn encode(&self, image: &DynamicImage, _quality: f32) -> Result<Vec<u8>, String> {
        let mut buffer = Vec::new();
        image
            .write_with_encoder(WebPEncoder::new_lossless(&mut buffer))
            .map_err(|e| format!("image-rs WebP encoding failed: {}", e))?;
        Ok(buffer)
    }
}
