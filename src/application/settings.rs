//! Edge settings service: load, update and purge-host resolution.

use std::sync::Arc;

use crate::application::repos::{EdgeSettingsRepo, RepoError};
use crate::domain::settings::EdgeSettingsRecord;

/// Field-wise partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct EdgeSettingsUpdate {
    pub secret_id: Option<String>,
    pub secret_key: Option<String>,
    pub zone_id: Option<String>,
    pub default_host: Option<String>,
}

#[derive(Clone)]
pub struct EdgeSettingsService {
    repo: Arc<dyn EdgeSettingsRepo>,
    site_host: Option<String>,
}

impl EdgeSettingsService {
    /// `site_host` is the host of the configured site base URL, used as the
    /// fallback target for first-publish purges.
    pub fn new(repo: Arc<dyn EdgeSettingsRepo>, site_host: Option<String>) -> Self {
        Self { repo, site_host }
    }

    pub async fn load(&self) -> Result<EdgeSettingsRecord, RepoError> {
        self.repo.load().await
    }

    /// Apply a partial update and persist the merged record.
    pub async fn update(&self, update: EdgeSettingsUpdate) -> Result<EdgeSettingsRecord, RepoError> {
        let mut record = self.repo.load().await?;
        if let Some(secret_id) = update.secret_id {
            record.secret_id = secret_id.trim().to_string();
        }
        if let Some(secret_key) = update.secret_key {
            record.secret_key = secret_key.trim().to_string();
        }
        if let Some(zone_id) = update.zone_id {
            record.zone_id = zone_id.trim().to_string();
        }
        if let Some(default_host) = update.default_host {
            record.default_host = default_host.trim().to_string();
        }
        self.repo.save(record.clone()).await?;
        Ok(record)
    }

    /// Host used for first-publish purges: the configured default host, or
    /// the host of the site base URL when unset.
    pub fn resolve_purge_host(&self, record: &EdgeSettingsRecord) -> Option<String> {
        record
            .configured_host()
            .map(str::to_string)
            .or_else(|| self.site_host.clone())
    }
}
