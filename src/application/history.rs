//! History service: the audit trail every purge attempt lands in.

use std::sync::Arc;

use metrics::counter;
use tracing::error;

use crate::application::repos::{HistoryRepo, RepoError};
use crate::domain::history::HistoryRecord;
use crate::domain::purge::PurgeKind;

/// Default number of records shown on the admin surface.
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Thin wrapper around the history repository to simplify recording purge
/// attempts.
#[derive(Clone)]
pub struct HistoryService {
    repo: Arc<dyn HistoryRepo>,
}

impl HistoryService {
    pub fn new(repo: Arc<dyn HistoryRepo>) -> Self {
        Self { repo }
    }

    /// Record one purge attempt. A failing history write is logged and
    /// swallowed; the log must never take a purge down with it.
    pub async fn record(
        &self,
        kind: PurgeKind,
        target: impl Into<String>,
        success: bool,
        message: impl Into<String>,
    ) {
        let record = HistoryRecord::new(kind, target, success, message);
        match self.repo.append(record).await {
            Ok(evicted) if evicted > 0 => {
                counter!("spurgo_history_evicted_total").increment(evicted as u64);
            }
            Ok(_) => {}
            Err(err) => {
                error!(
                    target = "spurgo::history",
                    error = %err,
                    "failed to append history record"
                );
            }
        }
    }

    /// Newest `limit` records, newest first; `None` uses the admin default.
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<HistoryRecord>, RepoError> {
        self.repo
            .list_recent(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .await
    }

    /// Drop every record. Confirmation is the caller's business.
    pub async fn clear(&self) -> Result<(), RepoError> {
        self.repo.clear().await
    }
}
