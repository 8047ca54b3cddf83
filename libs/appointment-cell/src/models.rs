// libs/appointment-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use shared_models::AppError;
use shared_utils::dates;

/// Prefix of ids assigned to events that the server has not confirmed yet.
pub const LOCAL_ID_PREFIX: &str = "local-";

// ==============================================================================
// WIRE MODELS
// ==============================================================================

/// Appointment id as the backend sends it: numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AppointmentId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentId::Number(n) => write!(f, "{}", n),
            AppointmentId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Appointment record exchanged with `/agendamentos`.
///
/// Also accepts the spreadsheet-style column names of imported rows. Fields
/// the client does not model are kept in `extra` and written back untouched
/// on update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AppointmentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(default, alias = "dataAgendamento", alias = "Data agenda")]
    pub data_consulta: String,
    #[serde(default, alias = "horaAgendamento", alias = "Hora Agenda")]
    pub hora_consulta: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fim_consulta: Option<String>,
    #[serde(default, alias = "Nome paciente")]
    pub nome_paciente: String,
    #[serde(default, alias = "Número celular")]
    pub numero_paciente: String,
    #[serde(default, alias = "nomeMedico", alias = "Nome medico")]
    pub nome_profissional: String,
    #[serde(default, alias = "Especialidade")]
    pub especialidade_profissional: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalidade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cor: Option<String>,
    #[serde(default, alias = "obsAgendamento", alias = "anotações")]
    pub anotacoes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AppointmentRecord {
    /// `especialidadeProfissional`, or the short `especialidade` key some
    /// payloads send instead. Both may be present.
    pub fn specialty(&self) -> &str {
        let main = self.especialidade_profissional.trim();
        if !main.is_empty() {
            return main;
        }
        self.extra
            .get("especialidade")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    Agendada,
    Realizada,
    #[serde(rename = "Paciente Faltou")]
    PacienteFaltou,
    Cancelada,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Agendada,
        AppointmentStatus::Realizada,
        AppointmentStatus::PacienteFaltou,
        AppointmentStatus::Cancelada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Agendada => "Agendada",
            AppointmentStatus::Realizada => "Realizada",
            AppointmentStatus::PacienteFaltou => "Paciente Faltou",
            AppointmentStatus::Cancelada => "Cancelada",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CalendarError::InvalidForm(format!("status desconhecido: {}", wanted)))
    }
}

/// How a completed appointment actually took place.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Modality {
    Presencial,
    Teleconsulta,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Presencial => "Presencial",
            Modality::Teleconsulta => "Teleconsulta",
        }
    }
}

impl FromStr for Modality {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "presencial" => Ok(Modality::Presencial),
            "teleconsulta" => Ok(Modality::Teleconsulta),
            other => Err(CalendarError::InvalidForm(format!("modalidade desconhecida: {}", other))),
        }
    }
}

// ==============================================================================
// DISPLAY MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub color: String,
    pub props: EventProps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventProps {
    pub patient_name: String,
    pub professional_name: String,
    /// Specialty title as shown to staff.
    pub category: String,
    /// Catalog id; `None` when the specialty is not in the catalog.
    pub category_id: Option<String>,
    pub status: Option<AppointmentStatus>,
    pub modality: Option<Modality>,
    pub notes: String,
    /// The record this event was built from.
    #[serde(skip)]
    pub source: AppointmentRecord,
}

impl CalendarEvent {
    pub fn is_local(&self) -> bool {
        self.id.starts_with(LOCAL_ID_PREFIX)
    }

    /// Builds the record sent to the API, starting from the source record so
    /// unmodelled fields survive the round trip.
    pub fn to_record(&self) -> AppointmentRecord {
        let mut record = self.props.source.clone();

        record.id = if self.is_local() {
            None
        } else {
            Some(match self.id.parse::<i64>() {
                Ok(n) => AppointmentId::Number(n),
                Err(_) => AppointmentId::Text(self.id.clone()),
            })
        };
        record.titulo = Some(self.title.clone());
        record.data_consulta = dates::format_br_date(self.start.date());
        record.hora_consulta = dates::format_time(self.start.time());
        record.fim_consulta = Some(dates::format_iso_datetime(self.end));
        record.nome_paciente = self.props.patient_name.clone();
        record.nome_profissional = self.props.professional_name.clone();
        record.especialidade_profissional = self.props.category.clone();
        record.status = self.props.status.map(|s| s.as_str().to_string());
        record.modalidade = self.props.modality.map(|m| m.as_str().to_string());
        record.cor = Some(self.color.clone());
        record.anotacoes = self.props.notes.clone();
        record
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid event: {0}")]
    InvalidForm(String),

    /// The backend never returned an id for this event, so it cannot be
    /// addressed remotely until the period is reloaded.
    #[error("Event {0} is not synchronized yet; reload the calendar first")]
    NotSynced(String),

    #[error(transparent)]
    Api(#[from] AppError),
}

impl CalendarError {
    pub fn user_message(&self) -> String {
        match self {
            CalendarError::Api(err) => err.user_message().to_string(),
            other => other.to_string(),
        }
    }
}
