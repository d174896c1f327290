//! Shared request and response types for the spurgo webhook and admin API.
//!
//! Kept in a standalone crate so the service and the command-line client
//! agree on the wire contract without the client linking the whole service.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Content lifecycle notification pushed by the publishing platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTransitionRequest {
    pub new_status: String,
    pub old_status: String,
    pub content: ContentPayload,
}

/// The content item a lifecycle notification refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPayload {
    pub id: String,
    /// Content kind as the platform names it, e.g. `post` or `page`.
    #[serde(default, alias = "type")]
    pub kind: String,
    #[serde(default)]
    pub permalink: Option<String>,
}

/// Manual purge of a single URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeUrlRequest {
    pub url: String,
}

/// Confirmation wrapper for destructive admin operations.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub confirm: bool,
}

/// Acknowledgement returned after a purge task was accepted remotely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurgeSubmittedResponse {
    pub kind: String,
    pub target: String,
    pub request_id: String,
    pub task_id: String,
    pub message: String,
}

/// One recorded purge attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub kind: String,
    pub target: String,
    pub success: bool,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Newest-first page of purge history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPage {
    pub entries: Vec<HistoryEntry>,
}

/// Edge settings as exposed to operators; the secret key never leaves the
/// service, only whether one is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeSettingsView {
    pub secret_id: String,
    pub secret_key_set: bool,
    pub zone_id: String,
    pub default_host: String,
}

/// Partial update of the edge settings; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeSettingsUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_host: Option<String>,
}
