//! Read-path URL rewriting
//!
//! Offloaded files keep their host URLs in the database; they are pointed at the
//! bucket on every read instead. Rewriting is a prefix substitution, recomputed
//! each call and never persisted.

use std::borrow::Cow;

use crate::events::ClientAttachment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRewriter {
    local_base: String,
    remote_base: String,
}

impl UrlRewriter {
    /// # Arguments
    /// * `local_base` - URL the host serves its media directory under
    /// * `remote_base` - Public base URL of the bucket
    pub fn new(local_base: impl Into<String>, remote_base: impl Into<String>) -> Self {
        let local_base: String = local_base.into();
        let remote_base: String = remote_base.into();
        Self {
            local_base: local_base.trim_end_matches('/').to_string(),
            remote_base: remote_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn local_base(&self) -> &str {
        &self.local_base
    }

    pub fn remote_base(&self) -> &str {
        &self.remote_base
    }

    /// Replace the local base prefix of `url` with the bucket's base.
    ///
    /// URLs outside the local base, and URLs already under the remote base, are
    /// returned unchanged, so `rewrite(rewrite(u)) == rewrite(u)`.
    pub fn rewrite<'a>(&self, url: &'a str) -> Cow<'a, str> {
        if strip_base(url, &self.remote_base).is_some() {
            return Cow::Borrowed(url);
        }
        match strip_base(url, &self.local_base) {
            Some(rest) => Cow::Owned(format!("{}{}", self.remote_base, rest)),
            None => Cow::Borrowed(url),
        }
    }

    /// Point the attachment and every size entry at the rewritten original.
    ///
    /// Converted images have no remote thumbnails, so all sizes show the full image.
    pub fn prepare_for_display(&self, mut attachment: ClientAttachment) -> ClientAttachment {
        let url = self.rewrite(&attachment.url).into_owned();
        for size in attachment.sizes.values_mut() {
            size.url = url.clone();
        }
        attachment.url = url;
        attachment
    }
}

/// The part of `url` after `base`, when `base` ends at a path boundary.
fn strip_base<'a>(url: &'a str, base: &str) -> Option<&'a str> {
    if base.is_empty() {
        return None;
    }
    let rest = url.strip_prefix(base)?;
    if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') || rest.starts_with('#') {
        Some(rest)
    } else {
        None
    }
}
