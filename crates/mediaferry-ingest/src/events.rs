//! Host event payloads
//!
//! The adapter's wire types. Hosts send a [`HostEvent`] and get a [`HostReply`]
//! back; client attachments pass through with only their URLs changed.

use mediaferry_core::{AttachmentId, AttachmentMetadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inbound callback from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hook", rename_all = "snake_case")]
pub enum HostEvent {
    /// Fired once the host has built the draft metadata for a new upload.
    MetadataGenerated {
        attachment_id: AttachmentId,
        metadata: AttachmentMetadata,
    },
    /// Fired for every new attachment.
    AttachmentCreated { attachment_id: AttachmentId },
}

impl HostEvent {
    pub fn attachment_id(&self) -> AttachmentId {
        match self {
            HostEvent::MetadataGenerated { attachment_id, .. }
            | HostEvent::AttachmentCreated { attachment_id } => *attachment_id,
        }
    }
}

/// Value handed back to the host. `Nothing` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostReply {
    Metadata(AttachmentMetadata),
    Nothing,
}

/// Client-side representation of an attachment (media picker, REST responses).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientAttachment {
    pub url: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sizes: BTreeMap<String, ClientSize>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSize {
    pub url: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
