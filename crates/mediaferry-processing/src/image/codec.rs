//! Image conversion
//!
//! `Codec::convert` turns an image on disk into a sibling file in the target
//! format. It writes the new file and never touches the input; deleting the
//! original is the caller's decision. Every failure comes back as
//! [`NotConvertible`] after being logged, so callers can always fall back to the
//! original file.

use image::{DynamicImage, ImageFormat, ImageReader};
use mediaferry_core::constants::DEFAULT_WEBP_QUALITY;
use mediaferry_core::IngestError;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::backend::{prepare_pixels, CodecBackend};
use super::detect::detect_image_format;
use super::image_rs::ImageRsBackend;
#[cfg(feature = "libwebp")]
use super::libwebp::LibWebpBackend;
use crate::compression::{clamp_quality, TargetFormat};

/// Why a file was left alone.
#[derive(Debug, thiserror::Error)]
pub enum NotConvertible {
    #[error("{} is not a recognised image", path.display())]
    NotAnImage { path: PathBuf },

    #[error("source is already {format:?}")]
    AlreadyTarget { format: ImageFormat },

    #[error("no available backend supports {format:?} input")]
    NoCapableBackend { format: ImageFormat },

    #[error("output {} would overwrite the source", path.display())]
    WouldOverwriteSource { path: PathBuf },

    #[error("output {} already exists", path.display())]
    OutputExists { path: PathBuf },

    #[error("backend {backend} failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl NotConvertible {
    /// Expected outcomes (not an image, unsupported type) as opposed to failures.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            NotConvertible::NotAnImage { .. }
                | NotConvertible::AlreadyTarget { .. }
                | NotConvertible::NoCapableBackend { .. }
                | NotConvertible::OutputExists { .. }
        )
    }
}

impl From<NotConvertible> for IngestError {
    fn from(err: NotConvertible) -> Self {
        match err {
            NotConvertible::Backend { backend, message } => IngestError::ConversionBackendFailure {
                backend: backend.to_string(),
                message,
            },
            NotConvertible::Io(e) if e.kind() == io::ErrorKind::NotFound => {
                IngestError::LocalFileMissing(e.to_string())
            }
            NotConvertible::Io(e) => IngestError::ConversionBackendFailure {
                backend: "io".to_string(),
                message: e.to_string(),
            },
            other => IngestError::ConversionUnsupported(other.to_string()),
        }
    }
}

/// Converts images to the target format with the first capable backend.
pub struct Codec {
    backends: Vec<Box<dyn CodecBackend>>,
    target: TargetFormat,
    quality: f32,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(DEFAULT_WEBP_QUALITY)
    }
}

impl Codec {
    /// Codec with the default backend order: libwebp (when compiled in), then image-rs.
    pub fn new(quality: f32) -> Self {
        Self::with_backends(Self::default_backends(), quality)
    }

    pub fn with_backends(backends: Vec<Box<dyn CodecBackend>>, quality: f32) -> Self {
        Self {
            backends,
            target: TargetFormat::WebP,
            quality: clamp_quality(quality),
        }
    }

    pub fn default_backends() -> Vec<Box<dyn CodecBackend>> {
        let mut backends: Vec<Box<dyn CodecBackend>> = Vec::new();
        #[cfg(feature = "libwebp")]
        backends.push(Box::new(LibWebpBackend));
        backends.push(Box::new(ImageRsBackend));
        backends
    }

    pub fn target(&self) -> TargetFormat {
        self.target
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Names of the configured backends, in selection order.
    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Path the converted file would be written to: same directory and stem,
    /// target extension.
    pub fn output_path(&self, local_path: &Path) -> PathBuf {
        local_path.with_extension(self.target.extension())
    }

    /// Convert the image at `local_path`, returning the path of the new file.
    pub fn convert(&self, local_path: &Path) -> Result<PathBuf, NotConvertible> {
        let result = self.try_convert(local_path);
        match &result {
            Ok(output) => tracing::info!(
                source = %local_path.display(),
                output = %output.display(),
                "Converted image"
            ),
            Err(e) if e.is_expected() => tracing::debug!(
                path = %local_path.display(),
                reason = %e,
                "Leaving file unconverted"
            ),
            Err(e) => tracing::error!(
                path = %local_path.display(),
                error = %e,
                "Image conversion failed; keeping original"
            ),
        }
        result
    }

    fn try_convert(&self, local_path: &Path) -> Result<PathBuf, NotConvertible> {
        let format = detect_image_format(local_path)?.ok_or_else(|| NotConvertible::NotAnImage {
            path: local_path.to_path_buf(),
        })?;

        if format == self.target.to_image_format() {
            return Err(NotConvertible::AlreadyTarget { format });
        }

        let backend = self.select_backend(format)?;

        let output = self.output_path(local_path);
        if output == local_path {
            return Err(NotConvertible::WouldOverwriteSource { path: output });
        }
        if output.try_exists()? {
            return Err(NotConvertible::OutputExists { path: output });
        }

        let start = std::time::Instant::now();
        let decoded = decode(local_path, format).map_err(|message| NotConvertible::Backend {
            backend: backend.name(),
            message,
        })?;
        let pixels = prepare_pixels(decoded);

        let encoded =
            backend
                .encode(&pixels, self.quality)
                .map_err(|message| NotConvertible::Backend {
                    backend: backend.name(),
                    message,
                })?;

        write_new_file(&output, &encoded)?;

        tracing::debug!(
            backend = backend.name(),
            input_format = ?format,
            width = pixels.width(),
            height = pixels.height(),
            quality = self.quality,
            size_bytes = encoded.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Encoded image"
        );

        Ok(output)
    }

    fn select_backend(&self, format: ImageFormat) -> Result<&dyn CodecBackend, NotConvertible> {
        for backend in &self.backends {
            if !backend.is_available() {
                tracing::debug!(backend = backend.name(), "Backend unavailable, trying next");
                continue;
            }
            if backend.supports(format) {
                return Ok(backend.as_ref());
            }
            tracing::debug!(
                backend = backend.name(),
                input_format = ?format,
                "Backend does not support input, trying next"
            );
        }
        Err(NotConvertible::NoCapableBackend { format })
    }
}

/// Write `data` to `path` only if nothing is there yet.
///
/// The bytes go to a temp file in the same directory first, so a failed write
/// leaves no partial output behind.
fn write_new_file(path: &Path, data: &[u8]) -> Result<(), NotConvertible> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;

    temp.persist_noclobber(path).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            NotConvertible::OutputExists {
                path: path.to_path_buf(),
            }
        } else {
            NotConvertible::Io(e.error)
        }
    })?;
    Ok(())
}

fn decode(path: &Path, format: ImageFormat) -> Result<DynamicImage, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    ImageReader::with_format(BufReader::new(file), format)
        .decode()
        .map_err(|e| format!("decode failed: {}", e))
}
