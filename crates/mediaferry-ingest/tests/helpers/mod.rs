//! Test helpers: an in-memory host, a fake bucket and fixture files.
//!
//! Run from workspace root: `cargo test -p mediaferry-ingest`.

#![allow(dead_code)]

pub mod fixtures;

use anyhow::Result;
use async_trait::async_trait;
use mediaferry_core::{Attachment, AttachmentHost, AttachmentId, AttachmentMetadata};
use mediaferry_ingest::{Codec, MediaOffload, MediaRoot, MemoryStorage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const SITE_UPLOADS_URL: &str = "https://site.example/wp-content/uploads";
pub const BUCKET: &str = "mybucket";

/// Attachment records kept in a map, the way a host's database would.
#[derive(Default)]
pub struct InMemoryHost {
    base_dir: PathBuf,
    attachments: Mutex<HashMap<AttachmentId, Attachment>>,
    fail_updates: AtomicBool,
}

impl InMemoryHost {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Default::default()
        }
    }

    pub fn insert(&self, id: u64, relative_path: &str, mime_type: &str) -> AttachmentId {
        let id = AttachmentId(id);
        self.attachments.lock().unwrap().insert(
            id,
            Attachment {
                id,
                local_path: self.base_dir.join(relative_path),
                relative_path: relative_path.to_string(),
                mime_type: mime_type.to_string(),
                metadata: None,
            },
        );
        id
    }

    pub fn get(&self, id: AttachmentId) -> Option<Attachment> {
        self.attachments.lock().unwrap().get(&id).cloned()
    }

    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AttachmentHost for InMemoryHost {
    async fn attachment(&self, id: AttachmentId) -> Result<Option<Attachment>> {
        Ok(self.get(id))
    }

    async fn update_attached_file(
        &self,
        id: AttachmentId,
        relative_path: &str,
        mime_type: &str,
    ) -> Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            anyhow::bail!("database is read-only");
        }
        let mut attachments = self.attachments.lock().unwrap();
        let attachment = attachments
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("attachment {} not found", id))?;
        attachment.local_path = self.base_dir.join(relative_path);
        attachment.relative_path = relative_path.to_string();
        attachment.mime_type = mime_type.to_string();
        Ok(())
    }
}

/// Everything a pipeline test needs, rooted in a temp `uploads/` directory.
pub struct TestEnv {
    pub offload: MediaOffload,
    pub host: Arc<InMemoryHost>,
    pub storage: MemoryStorage,
    pub media_root: MediaRoot,
    pub _temp_dir: TempDir,
}

impl TestEnv {
    pub fn uploads(&self) -> &Path {
        self.media_root.base_dir()
    }

    pub fn local(&self, relative_path: &str) -> PathBuf {
        self.uploads().join(relative_path)
    }

    /// Draft metadata as the host would generate it, thumbnails included.
    pub fn draft_metadata(&self, relative_path: &str) -> AttachmentMetadata {
        fixtures::draft_metadata(relative_path)
    }
}

pub fn setup_test_env() -> TestEnv {
    setup_test_env_with_codec(Codec::default())
}

pub fn setup_test_env_with_codec(codec: Codec) -> TestEnv {
    let temp_dir = TempDir::new().unwrap();
    let uploads = temp_dir.path().join("uploads");
    std::fs::create_dir_all(&uploads).unwrap();

    let media_root = MediaRoot::new(&uploads, SITE_UPLOADS_URL);
    let host = Arc::new(InMemoryHost::new(&uploads));
    let storage = MemoryStorage::new(BUCKET);

    let offload = MediaOffload::with_storage(
        Arc::new(storage.clone()),
        codec,
        media_root.clone(),
        host.clone(),
    );

    TestEnv {
        offload,
        host,
        storage,
        media_root,
        _temp_dir: temp_dir,
    }
}
