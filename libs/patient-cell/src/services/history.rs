use chrono::Local;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::{AppError, AppResult};
use shared_utils::dates;

use crate::models::{PatientRecord, StaffNote, TimelineEntry};
use crate::services::timeline::prepend_unique;

pub struct PatientService {
    api: ApiClient,
    staff_user_id: String,
    staff_user_name: String,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            api: ApiClient::from_config(config)?,
            staff_user_id: config.staff_user_id.clone(),
            staff_user_name: config.staff_user_name.clone(),
        })
    }

    /// Loads a patient's history. An unknown patient is `Ok(None)`.
    #[instrument(skip(self))]
    pub async fn fetch_history(&self, patient_id: &str) -> AppResult<Option<PatientRecord>> {
        let path = format!("/api/paciente/{}/historico", urlencoding::encode(patient_id.trim()));

        match self.api.get::<Option<PatientRecord>>(&path, &[]).await {
            Ok(record) => {
                debug!(
                    "Loaded history with {} entries",
                    record.as_ref().map(|r| r.linha_do_tempo.len()).unwrap_or(0)
                );
                Ok(record)
            }
            Err(AppError::NotFound(_)) => {
                warn!("Patient {} not found", patient_id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Saves a staff annotation and prepends it to the local timeline.
    /// Blank text is rejected before any request is made.
    #[instrument(skip(self, patient, text), fields(patient_id = %patient.id_paciente))]
    pub async fn add_annotation(&self, patient: &mut PatientRecord, text: &str) -> AppResult<TimelineEntry> {
        let content = text.trim();
        if content.is_empty() {
            return Err(AppError::ValidationError("Annotation text is empty".to_string()));
        }

        let body = json!({
            "idPaciente": patient.id_paciente,
            "idUsuario": self.staff_user_id,
            "conteudoAnotacao": content,
        });
        self.api.post_no_content("/api/anotacoes", body).await?;

        let stamp = Local::now();
        let now = stamp.naive_local();
        let entry = TimelineEntry::StaffNote(StaffNote {
            id: stamp.timestamp_millis().to_string(),
            data: dates::format_br_date(now.date()),
            hora: now.format("%H:%M:%S").to_string(),
            anotacao: content.to_string(),
            id_usuario: self.staff_user_id.clone(),
            nome_usuario: self.staff_user_name.clone(),
        });
        prepend_unique(&mut patient.linha_do_tempo, entry.clone());

        info!("Annotation saved");
        Ok(entry)
    }

    /// Asks the backend to resend the appointment reminder to the patient.
    #[instrument(skip(self))]
    pub async fn resend_reminder(&self, patient_id: &str) -> AppResult<()> {
        let body = json!({ "idPaciente": patient_id });
        self.api.post_no_content("/api/enviarlembrete", body).await?;

        info!("Reminder resent");
        Ok(())
    }
}
