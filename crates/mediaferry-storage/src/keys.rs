//! Object key derivation.
//!
//! The remote object key for a file is its path relative to the local media root,
//! `/`-separated. Because the mapping is deterministic, the remote URL of any file
//! can be rebuilt from its relative path without a lookup table.

use std::path::{Component, Path, PathBuf};

use crate::traits::{StorageError, StorageResult};

/// Public base URL for a bucket.
///
/// AWS uses the virtual-hosted form `https://{bucket}.s3.amazonaws.com`; S3-compatible
/// providers get path-style `{endpoint}/{bucket}`.
pub fn public_base_url(bucket: &str, endpoint_url: Option<&str>) -> String {
    match endpoint_url {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
        None => format!("https://{}.s3.amazonaws.com", bucket),
    }
}

/// Reject keys that could escape the media root or collide with absolute paths.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.starts_with('/') || key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}

/// The host's local media directory and the URL it is served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRoot {
    base_dir: PathBuf,
    base_url: String,
}

impl MediaRoot {
    /// # Arguments
    /// * `base_dir` - Root directory of uploaded media (e.g., "/var/www/wp-content/uploads")
    /// * `base_url` - URL the directory is served under (e.g., "https://site.example/wp-content/uploads")
    pub fn new(base_dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_dir: base_dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Object key for a file under the media root.
    pub fn relative_key(&self, path: &Path) -> StorageResult<String> {
        let relative = match path.strip_prefix(&self.base_dir) {
            Ok(relative) => relative.to_path_buf(),
            // Symlinked roots: compare canonical forms before giving up.
            Err(_) => {
                let base = self.base_dir.canonicalize()?;
                let canonical = path.canonicalize()?;
                canonical
                    .strip_prefix(&base)
                    .map(Path::to_path_buf)
                    .map_err(|_| {
                        StorageError::InvalidKey(format!(
                            "{} is outside media root {}",
                            path.display(),
                            self.base_dir.display()
                        ))
                    })?
            }
        };

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => {
                    return Err(StorageError::InvalidKey(format!(
                        "{} does not resolve to a key under the media root",
                        path.display()
                    )))
                }
            }
        }

        let key = segments.join("/");
        validate_key(&key)?;
        Ok(key)
    }
}
