//! Purge request model: operation kinds, target normalization and receipts.

use serde::{Deserialize, Serialize};

use super::error::PurgeError;

/// The three purge operations the edge API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurgeKind {
    Url,
    Host,
    All,
}

impl PurgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Host => "host",
            Self::All => "all",
        }
    }
}

/// Purge method modifier. `Invalidate` marks cached copies stale instead of
/// deleting them, so the edge can serve stale while revalidating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurgeMethod {
    Invalidate,
}

impl PurgeMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Invalidate => "invalidate",
        }
    }
}

/// A validated purge request ready for submission.
///
/// `targets` is already filtered and deduplicated; it is empty exactly when
/// `kind` is [`PurgeKind::All`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeRequest {
    pub kind: PurgeKind,
    pub targets: Vec<String>,
    pub method: Option<PurgeMethod>,
}

impl PurgeRequest {
    /// Per-URL purge without a method modifier.
    pub fn urls<I, S>(targets: I) -> Result<Self, PurgeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let targets = normalize_targets(targets);
        if targets.is_empty() {
            return Err(PurgeError::EmptyTarget);
        }
        Ok(Self {
            kind: PurgeKind::Url,
            targets,
            method: None,
        })
    }

    /// Per-host purge; always submitted with `invalidate`.
    pub fn hosts<I, S>(targets: I) -> Result<Self, PurgeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let targets = normalize_targets(targets);
        if targets.is_empty() {
            return Err(PurgeError::EmptyTarget);
        }
        Ok(Self {
            kind: PurgeKind::Host,
            targets,
            method: Some(PurgeMethod::Invalidate),
        })
    }

    /// Site-wide purge; always `invalidate`, never carries targets.
    pub fn all() -> Self {
        Self {
            kind: PurgeKind::All,
            targets: Vec::new(),
            method: Some(PurgeMethod::Invalidate),
        }
    }

    /// Human-readable target label used for history records.
    pub fn target_label(&self) -> String {
        match self.kind {
            PurgeKind::All => "all".to_string(),
            _ => self.targets.join(", "),
        }
    }
}

/// Drop empty entries and duplicates; first occurrence wins, order is kept.
fn normalize_targets<I, S>(targets: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut normalized: Vec<String> = Vec::new();
    for target in targets {
        let target = target.into();
        let trimmed = target.trim();
        if trimmed.is_empty() {
            continue;
        }
        if normalized.iter().any(|seen| seen == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}

/// Opaque identifiers handed back by the remote purge API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReceipt {
    pub request_id: String,
    pub task_id: String,
}
