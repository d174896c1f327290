//! In-memory store used by tests and ephemeral deployments.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::warn;

use crate::application::repos::{EdgeSettingsRepo, HistoryRepo, RepoError};
use crate::domain::history::{HistoryRecord, push_capped};
use crate::domain::settings::EdgeSettingsRecord;

/// Mutex-backed repositories with the same semantics as [`super::FileStore`].
#[derive(Default)]
pub struct MemoryStore {
    settings: Mutex<EdgeSettingsRecord>,
    history: Mutex<Vec<HistoryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the settings document directly, bypassing the async trait.
    pub fn set_settings(&self, record: EdgeSettingsRecord) {
        *lock(&self.settings, "set_settings") = record;
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>, op: &'static str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                op,
                target_module = "infra::store::memory",
                "recovered from poisoned store lock"
            );
            poisoned.into_inner()
        }
    }
}

#[async_trait]
impl EdgeSettingsRepo for MemoryStore {
    async fn load(&self) -> Result<EdgeSettingsRecord, RepoError> {
        Ok(lock(&self.settings, "load").clone())
    }

    async fn save(&self, record: EdgeSettingsRecord) -> Result<(), RepoError> {
        *lock(&self.settings, "save") = record;
        Ok(())
    }
}

#[async_trait]
impl HistoryRepo for MemoryStore {
    async fn append(&self, record: HistoryRecord) -> Result<usize, RepoError> {
        Ok(push_capped(&mut lock(&self.history, "append"), record))
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, RepoError> {
        Ok(lock(&self.history, "list_recent")
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn clear(&self) -> Result<(), RepoError> {
        lock(&self.history, "clear").clear();
        Ok(())
    }
}
