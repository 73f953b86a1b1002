use image::ImageFormat;

/// Output format for converted images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetFormat {
    #[default]
    WebP,
}

impl TargetFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            TargetFormat::WebP => "webp",
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            TargetFormat::WebP => "image/webp",
        }
    }

    pub fn to_image_format(self) -> ImageFormat {
        match self {
            TargetFormat::WebP => ImageFormat::WebP,
        }
    }
}

/// Clamp a configured quality into the encoder's 0-100 range.
pub fn clamp_quality(quality: f32) -> f32 {
    if quality.is_nan() {
        mediaferry_core::constants::DEFAULT_WEBP_QUALITY
    } else {
        quality.clamp(0.0, 100.0)
    }
}
