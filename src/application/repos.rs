//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::history::HistoryRecord;
use crate::domain::settings::EdgeSettingsRecord;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Access to the single edge settings document.
#[async_trait]
pub trait EdgeSettingsRepo: Send + Sync {
    async fn load(&self) -> Result<EdgeSettingsRecord, RepoError>;
    async fn save(&self, record: EdgeSettingsRecord) -> Result<(), RepoError>;
}

/// Bounded, newest-first log of purge attempts.
#[async_trait]
pub trait HistoryRepo: Send + Sync {
    /// Prepend a record, evicting beyond capacity. Returns how many records
    /// were evicted.
    async fn append(&self, record: HistoryRecord) -> Result<usize, RepoError>;

    async fn list_recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, RepoError>;

    async fn clear(&self) -> Result<(), RepoError>;
}
