//! Activation and the host adapter
//!
//! [`activate`] builds every component once from configuration and hands back a
//! [`MediaOffload`], the single object a host talks to. Without credentials
//! nothing is built, so no event handler can ever run half-configured.

use mediaferry_core::{AttachmentHost, AttachmentId, OffloadConfig};
use mediaferry_processing::Codec;
use mediaferry_storage::{create_storage, MediaRoot, ObjectStorage, ObjectStoreGateway, StorageError};
use std::sync::Arc;

use crate::events::{ClientAttachment, HostEvent, HostReply};
use crate::orchestrator::IngestOrchestrator;
use crate::rewriter::UrlRewriter;

const CREDENTIALS_NOTICE: &str = "Media offload is inactive: set AWS_ACCESS_KEY_ID and \
AWS_SECRET_ACCESS_KEY to upload media to the object store.";

#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    #[error("Object store credentials are not configured")]
    CredentialsMissing,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ActivationError {
    /// The one message an operator should see in the host's admin UI.
    pub fn admin_notice(&self) -> String {
        match self {
            ActivationError::CredentialsMissing => CREDENTIALS_NOTICE.to_string(),
            other => format!("Media offload is inactive: {}", other),
        }
    }
}

/// Build the offload pipeline for `host` from `config`.
pub fn activate(
    config: &OffloadConfig,
    media_root: MediaRoot,
    host: Arc<dyn AttachmentHost>,
) -> Result<MediaOffload, ActivationError> {
    if config.credentials().is_none() {
        tracing::warn!(
            bucket = %config.s3_bucket,
            "{}",
            CREDENTIALS_NOTICE
        );
        return Err(ActivationError::CredentialsMissing);
    }

    config
        .validate()
        .map_err(|e| ActivationError::InvalidConfig(e.to_string()))?;

    let storage = create_storage(config)?;
    let codec = Codec::new(config.webp_quality);

    tracing::info!(
        bucket = %storage.bucket(),
        region = %config.s3_region,
        backends = ?codec.backend_names(),
        quality = codec.quality(),
        "Media offload activated"
    );

    Ok(MediaOffload::with_storage(storage, codec, media_root, host))
}

/// Load configuration from the environment, install logging and activate.
///
/// A subscriber already installed by the host is left in place.
pub fn activate_from_env(
    media_root: MediaRoot,
    host: Arc<dyn AttachmentHost>,
) -> Result<MediaOffload, ActivationError> {
    let config =
        OffloadConfig::from_env().map_err(|e| ActivationError::InvalidConfig(e.to_string()))?;

    let environment = if config.is_production() {
        "production"
    } else {
        config.environment.as_str()
    };
    if let Err(e) = mediaferry_infra::init_telemetry(environment) {
        tracing::debug!(error = %e, "Keeping existing tracing subscriber");
    }

    activate(&config, media_root, host)
}

/// The activated pipeline: event handlers plus read-path rewriting.
#[derive(Clone)]
pub struct MediaOffload {
    orchestrator: IngestOrchestrator,
    rewriter: UrlRewriter,
}

impl MediaOffload {
    /// Assemble around any storage implementation.
    pub fn with_storage(
        storage: Arc<dyn ObjectStorage>,
        codec: Codec,
        media_root: MediaRoot,
        host: Arc<dyn AttachmentHost>,
    ) -> Self {
        let rewriter = UrlRewriter::new(media_root.base_url(), storage.public_base_url());
        let gateway = ObjectStoreGateway::new(storage);
        let orchestrator = IngestOrchestrator::new(host, Arc::new(codec), gateway, media_root);
        Self {
            orchestrator,
            rewriter,
        }
    }

    pub fn orchestrator(&self) -> &IngestOrchestrator {
        &self.orchestrator
    }

    pub fn rewriter(&self) -> &UrlRewriter {
        &self.rewriter
    }

    /// Route a host event to the orchestrator.
    pub async fn dispatch(&self, event: HostEvent) -> HostReply {
        tracing::debug!(attachment_id = %event.attachment_id(), "Dispatching host event");
        match event {
            HostEvent::MetadataGenerated {
                attachment_id,
                metadata,
            } => HostReply::Metadata(
                self.orchestrator
                    .on_metadata_generated(attachment_id, metadata)
                    .await,
            ),
            HostEvent::AttachmentCreated { attachment_id } => {
                self.orchestrator.on_attachment_created(attachment_id).await;
                HostReply::Nothing
            }
        }
    }

    /// Public URL for an attachment; `url` is the host's own URL for it.
    pub fn attachment_url(&self, url: &str, attachment_id: AttachmentId) -> String {
        let rewritten = self.rewriter.rewrite(url);
        tracing::trace!(attachment_id = %attachment_id, url = %rewritten, "Rewrote attachment URL");
        rewritten.into_owned()
    }

    pub fn prepare_attachment_for_js(&self, attachment: ClientAttachment) -> ClientAttachment {
        self.rewriter.prepare_for_display(attachment)
    }
}
