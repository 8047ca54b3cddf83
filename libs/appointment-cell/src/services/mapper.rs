// libs/appointment-cell/src/services/mapper.rs
use chrono::{Duration, NaiveDateTime};
use tracing::warn;
use uuid::Uuid;

use shared_models::catalog;
use shared_utils::dates;

use crate::models::{AppointmentRecord, CalendarEvent, EventProps, LOCAL_ID_PREFIX};

pub const DEFAULT_DURATION_MINUTES: i64 = 60;
const DEFAULT_PATIENT_LABEL: &str = "Paciente";

pub fn local_id() -> String {
    format!("{}{}", LOCAL_ID_PREFIX, Uuid::new_v4())
}

/// Maps a backend record to a calendar event. `now` is used as the start
/// when the record carries no usable date.
pub fn to_event(record: AppointmentRecord, now: NaiveDateTime) -> CalendarEvent {
    let start = dates::combine_date_time(&record.data_consulta, Some(&record.hora_consulta))
        .unwrap_or_else(|| {
            warn!(
                "Appointment {:?} has unreadable date {:?} {:?}",
                record.id, record.data_consulta, record.hora_consulta
            );
            now
        });
    let end = parse_end(&record, start);

    let specialty = record.specialty().to_string();
    let category = catalog::find_by_title(&specialty);
    let color = match record.cor.as_deref().map(str::trim) {
        Some(cor) if !cor.is_empty() => cor.to_string(),
        _ => catalog::color_for_specialty(&specialty).to_string(),
    };

    let title = match record.titulo.as_deref().map(str::trim) {
        Some(titulo) if !titulo.is_empty() => titulo.to_string(),
        _ => default_title(&specialty, &record.nome_paciente),
    };

    let id = record
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(local_id);

    CalendarEvent {
        id,
        title,
        start,
        end,
        color,
        props: EventProps {
            patient_name: record.nome_paciente.clone(),
            professional_name: record.nome_profissional.clone(),
            category: specialty,
            category_id: category.map(|c| c.id.to_string()),
            status: record.status.as_deref().and_then(|s| s.parse().ok()),
            modality: record.modalidade.as_deref().and_then(|m| m.parse().ok()),
            notes: record.anotacoes.clone(),
            source: record,
        },
    }
}

pub fn default_title(specialty: &str, patient: &str) -> String {
    let patient = patient.trim();
    let patient = if patient.is_empty() { DEFAULT_PATIENT_LABEL } else { patient };
    format!("{} - {}", specialty, patient)
}

fn parse_end(record: &AppointmentRecord, start: NaiveDateTime) -> NaiveDateTime {
    let explicit = record.fim_consulta.as_deref().and_then(|fim| {
        dates::combine_date_time(fim, None)
            .or_else(|| dates::parse_time(fim).map(|t| start.date().and_time(t)))
    });

    match explicit {
        Some(end) if end > start => end,
        _ => start + Duration::minutes(DEFAULT_DURATION_MINUTES),
    }
}
