// =====================================================================================
// DRAFT STORAGE - PENDING AND FINALIZED ROWS ON DISK
// =====================================================================================

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::{AppError, AppResult};

use crate::models::{DeletedRow, UploadRow};

const PENDING_FILE: &str = "tempPatientData.json";
const FINALIZED_FILE: &str = "patientData.json";
const UNDO_FILE: &str = "deletedRows.json";

/// JSON files kept between wizard steps.
#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.draft_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn load_pending(&self) -> AppResult<Option<Vec<UploadRow>>> {
        self.read(PENDING_FILE).await
    }

    pub async fn save_pending(&self, rows: &[UploadRow]) -> AppResult<()> {
        self.write(PENDING_FILE, &rows).await
    }

    /// Drops the pending rows and any deletions that could still be undone.
    pub async fn clear_pending(&self) -> AppResult<()> {
        self.remove(PENDING_FILE).await?;
        self.remove(UNDO_FILE).await
    }

    pub async fn load_finalized(&self) -> AppResult<Option<Vec<UploadRow>>> {
        self.read(FINALIZED_FILE).await
    }

    pub async fn save_finalized(&self, rows: &[UploadRow]) -> AppResult<()> {
        self.write(FINALIZED_FILE, &rows).await
    }

    pub async fn load_deleted(&self) -> AppResult<Vec<DeletedRow>> {
        Ok(self.read(UNDO_FILE).await?.unwrap_or_default())
    }

    pub async fn save_deleted(&self, deleted: &[DeletedRow]) -> AppResult<()> {
        if deleted.is_empty() {
            return self.remove(UNDO_FILE).await;
        }
        self.write(UNDO_FILE, &deleted).await
    }

    async fn read<T: DeserializeOwned>(&self, name: &str) -> AppResult<Option<T>> {
        let path = self.dir.join(name);
        match fs::read(&path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    warn!("Draft {} is corrupt: {}", path.display(), e);
                    AppError::Storage(format!("{}: {}", path.display(), e))
                })?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> AppResult<()> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(&path, bytes).await?;
        debug!("Wrote draft {}", path.display());
        Ok(())
    }

    async fn remove(&self, name: &str) -> AppResult<()> {
        match fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
