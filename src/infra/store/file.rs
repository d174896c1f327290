//! JSON-document stores under the data directory.
//!
//! Settings live in one document, history in one newest-first list. Writes
//! replace the document atomically through a sibling temp file so a crash
//! mid-write never leaves a half-serialized document behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;

use crate::application::repos::{EdgeSettingsRepo, HistoryRepo, RepoError};
use crate::domain::history::{HistoryRecord, push_capped};
use crate::domain::settings::EdgeSettingsRecord;

const SETTINGS_FILE: &str = "edge_settings.json";
const HISTORY_FILE: &str = "history.json";

/// Filesystem-backed repositories for settings and history.
pub struct FileStore {
    settings_path: PathBuf,
    history_path: PathBuf,
    settings_lock: Mutex<()>,
    history_lock: Mutex<()>,
}

impl FileStore {
    /// Root the store at `data_dir`, creating the directory if necessary.
    pub fn new(data_dir: &Path) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            settings_path: data_dir.join(SETTINGS_FILE),
            history_path: data_dir.join(HISTORY_FILE),
            settings_lock: Mutex::new(()),
            history_lock: Mutex::new(()),
        })
    }
}

/// Missing documents deserialize to their default; a corrupt document is a
/// persistence error, not silent data loss.
async fn read_or_default<T>(path: &Path) -> Result<T, RepoError>
where
    T: serde::de::DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(RepoError::from_persistence),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(err) => Err(RepoError::from_persistence(err)),
    }
}

/// Replace `path` atomically: write a sibling temp file, then rename over.
async fn write_document<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), RepoError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(RepoError::from_persistence)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes)
        .await
        .map_err(RepoError::from_persistence)?;
    fs::rename(&tmp, path)
        .await
        .map_err(RepoError::from_persistence)?;
    Ok(())
}

#[async_trait]
impl EdgeSettingsRepo for FileStore {
    async fn load(&self) -> Result<EdgeSettingsRecord, RepoError> {
        let _guard = self.settings_lock.lock().await;
        read_or_default(&self.settings_path).await
    }

    async fn save(&self, record: EdgeSettingsRecord) -> Result<(), RepoError> {
        let _guard = self.settings_lock.lock().await;
        write_document(&self.settings_path, &record).await
    }
}

#[async_trait]
impl HistoryRepo for FileStore {
    async fn append(&self, record: HistoryRecord) -> Result<usize, RepoError> {
        let _guard = self.history_lock.lock().await;
        let mut records: Vec<HistoryRecord> = read_or_default(&self.history_path).await?;
        let evicted = push_capped(&mut records, record);
        write_document(&self.history_path, &records).await?;
        Ok(evicted)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, RepoError> {
        let _guard = self.history_lock.lock().await;
        let mut records: Vec<HistoryRecord> = read_or_default(&self.history_path).await?;
        records.truncate(limit);
        Ok(records)
    }

    async fn clear(&self) -> Result<(), RepoError> {
        let _guard = self.history_lock.lock().await;
        write_document(&self.history_path, &Vec::<HistoryRecord>::new()).await
    }
}
