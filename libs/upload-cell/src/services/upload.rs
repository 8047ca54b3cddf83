// =====================================================================================
// UPLOAD SERVICE - PERSISTS VALIDATED ROWS
// =====================================================================================

use serde::Serialize;
use tracing::{info, instrument};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::{AppError, AppResult};

use crate::models::UploadRow;

const SAVE_PATH: &str = "/api/upload/salvar";

#[derive(Debug, Clone)]
pub struct UploadService {
    api: ApiClient,
}

impl UploadService {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            api: ApiClient::from_config(config)?,
        })
    }

    /// Sends rows to the save endpoint and returns the rows it stored.
    #[instrument(skip(self, rows), fields(count = rows.len()))]
    pub async fn save_rows<T: Serialize>(&self, rows: &[T]) -> AppResult<Vec<UploadRow>> {
        let body = serde_json::to_value(rows).map_err(AppError::from)?;
        let saved: Option<Vec<UploadRow>> = self.api.post(SAVE_PATH, body).await?;

        let saved = saved.unwrap_or_default();
        info!("Upload saved, backend returned {} rows", saved.len());
        Ok(saved)
    }
}
