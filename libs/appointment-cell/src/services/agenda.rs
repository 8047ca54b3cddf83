// libs/appointment-cell/src/services/agenda.rs
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::{debug, info, instrument};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::{AppError, AppResult};
use shared_utils::dates;

use crate::models::{AppointmentRecord, CalendarEvent};
use crate::services::mapper;

const AGENDA_PATH: &str = "/agendamentos";

/// Remote appointment store. `CalendarState` only talks to the backend
/// through this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentGateway: Send + Sync {
    async fn fetch_by_period(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<AppointmentRecord>>;

    async fn create(&self, record: &AppointmentRecord) -> AppResult<AppointmentRecord>;

    async fn update(&self, id: &str, record: &AppointmentRecord) -> AppResult<AppointmentRecord>;

    async fn delete(&self, id: &str) -> AppResult<()>;
}

pub struct AgendaService {
    api: ApiClient,
}

impl AgendaService {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            api: ApiClient::for_agenda(config)?,
        })
    }

    pub fn with_client(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetches a period and maps it straight to display events.
    pub async fn fetch_events(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<CalendarEvent>> {
        let records = self.fetch_by_period(start, end).await?;
        let now = Local::now().naive_local();
        Ok(records.into_iter().map(|r| mapper::to_event(r, now)).collect())
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", AGENDA_PATH, urlencoding::encode(id))
    }

    fn to_body(record: &AppointmentRecord) -> AppResult<Value> {
        serde_json::to_value(record).map_err(AppError::from)
    }
}

#[async_trait]
impl AppointmentGateway for AgendaService {
    #[instrument(skip(self))]
    async fn fetch_by_period(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<AppointmentRecord>> {
        let query = [
            ("dataInicio", dates::format_iso_date(start)),
            ("dataFim", dates::format_iso_date(end)),
        ];
        let records: Option<Vec<AppointmentRecord>> = self.api.get(AGENDA_PATH, &query).await?;
        let records = records.unwrap_or_default();

        debug!("Fetched {} appointments between {} and {}", records.len(), start, end);
        Ok(records)
    }

    #[instrument(skip(self, record), fields(patient = %record.nome_paciente))]
    async fn create(&self, record: &AppointmentRecord) -> AppResult<AppointmentRecord> {
        let created: Option<AppointmentRecord> = self.api.post(AGENDA_PATH, Self::to_body(record)?).await?;

        info!("Appointment created");
        // Backends that answer with an empty body are treated as an echo.
        Ok(created.unwrap_or_else(|| record.clone()))
    }

    #[instrument(skip(self, record))]
    async fn update(&self, id: &str, record: &AppointmentRecord) -> AppResult<AppointmentRecord> {
        let updated: Option<AppointmentRecord> = self
            .api
            .put(&Self::item_path(id), Self::to_body(record)?)
            .await?;

        info!("Appointment {} updated", id);
        Ok(updated.unwrap_or_else(|| record.clone()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> AppResult<()> {
        self.api.delete(&Self::item_path(id)).await?;
        info!("Appointment {} deleted", id);
        Ok(())
    }
}
