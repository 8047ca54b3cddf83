// =====================================================================================
// ALERT FETCH SERVICE
// =====================================================================================

use async_trait::async_trait;
use tracing::{debug, instrument};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::AppResult;

use crate::models::RiskAlert;

const TODAY_ALERTS_PATH: &str = "/api/alertas/hoje";

#[async_trait]
pub trait AlertSource: Send + Sync + 'static {
    async fn fetch_today(&self) -> AppResult<Vec<RiskAlert>>;
}

pub struct AlertService {
    api: ApiClient,
}

impl AlertService {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            api: ApiClient::from_config(config)?,
        })
    }
}

#[async_trait]
impl AlertSource for AlertService {
    #[instrument(skip(self))]
    async fn fetch_today(&self) -> AppResult<Vec<RiskAlert>> {
        let alerts: Option<Vec<RiskAlert>> = self.api.get(TODAY_ALERTS_PATH, &[]).await?;
        let alerts = alerts.unwrap_or_default();
        debug!("Fetched {} alerts for today", alerts.len());
        Ok(alerts)
    }
}
