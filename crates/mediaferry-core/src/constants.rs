//! Shared constants.

/// Region used when neither `S3_REGION` nor `AWS_REGION` is set.
pub const DEFAULT_S3_REGION: &str = "us-east-1";

/// Bucket used when `S3_BUCKET` is not set.
pub const DEFAULT_S3_BUCKET: &str = "media-offload";

/// Encoder quality (0-100) for converted images.
pub const DEFAULT_WEBP_QUALITY: f32 = 80.0;

/// Fallback content type when inspection finds nothing better.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
