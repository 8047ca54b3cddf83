// libs/appointment-cell/src/services/form.rs
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use shared_models::catalog::{self, FALLBACK_COLOR};
use shared_utils::dates;

use crate::models::{AppointmentRecord, AppointmentStatus, CalendarError, CalendarEvent, EventProps, Modality};
use crate::services::mapper::DEFAULT_DURATION_MINUTES;

/// Editable state behind the create/edit event dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventForm {
    pub title: String,
    pub color: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub patient_name: String,
    pub professional_name: String,
    pub category: String,
    pub status: Option<AppointmentStatus>,
    pub modality: Option<Modality>,
    pub notes: String,
}

impl EventForm {
    pub fn empty(now: NaiveDateTime) -> Self {
        Self::from_slot(now, now + Duration::minutes(DEFAULT_DURATION_MINUTES))
    }

    /// Form prefilled with a slot selected on the calendar grid.
    pub fn from_slot(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            title: String::new(),
            color: String::new(),
            start,
            end,
            patient_name: String::new(),
            professional_name: String::new(),
            category: String::new(),
            status: None,
            modality: None,
            notes: String::new(),
        }
    }

    pub fn from_event(event: &CalendarEvent) -> Self {
        Self {
            title: event.title.clone(),
            color: event.color.clone(),
            start: event.start,
            end: event.end,
            patient_name: event.props.patient_name.clone(),
            professional_name: event.props.professional_name.clone(),
            category: event.props.category.clone(),
            status: event.props.status,
            modality: event.props.modality,
            notes: event.props.notes.clone(),
        }
    }

    /// Picks a specialty; the color follows the catalog entry, or is cleared
    /// for specialties outside the catalog.
    pub fn set_category(&mut self, title: &str) {
        self.category = title.trim().to_string();
        self.color = catalog::find_by_title(title)
            .map(|c| c.color.to_string())
            .unwrap_or_default();
    }

    /// Modality only applies to completed appointments.
    pub fn set_status(&mut self, status: Option<AppointmentStatus>) {
        self.status = status;
        if status != Some(AppointmentStatus::Realizada) {
            self.modality = None;
        }
    }

    pub fn set_start_time(&mut self, hhmm: &str) -> Result<(), CalendarError> {
        self.start = with_time(self.start, hhmm)?;
        Ok(())
    }

    pub fn set_end_time(&mut self, hhmm: &str) -> Result<(), CalendarError> {
        self.end = with_time(self.end, hhmm)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CalendarError> {
        let mut missing = Vec::new();
        let required = [
            ("título", &self.title),
            ("paciente", &self.patient_name),
            ("profissional", &self.professional_name),
            ("categoria", &self.category),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                missing.push(label);
            }
        }
        if self.status.is_none() {
            missing.push("status");
        }
        if self.status == Some(AppointmentStatus::Realizada) && self.modality.is_none() {
            missing.push("modalidade");
        }

        if !missing.is_empty() {
            return Err(CalendarError::InvalidForm(format!(
                "campos obrigatórios: {}",
                missing.join(", ")
            )));
        }
        if self.end <= self.start {
            return Err(CalendarError::InvalidForm(
                "o término deve ser posterior ao início".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the event this form describes. `base` is the event being
    /// edited, if any; its source record is carried over.
    pub fn to_event(&self, id: String, base: Option<&CalendarEvent>) -> CalendarEvent {
        let category = catalog::find_by_title(&self.category);
        let color = if !self.color.trim().is_empty() {
            self.color.clone()
        } else {
            category.map(|c| c.color).unwrap_or(FALLBACK_COLOR).to_string()
        };
        let source = base
            .map(|e| e.props.source.clone())
            .unwrap_or_else(AppointmentRecord::default);

        CalendarEvent {
            id,
            title: self.title.trim().to_string(),
            start: self.start,
            end: self.end,
            color,
            props: EventProps {
                patient_name: self.patient_name.trim().to_string(),
                professional_name: self.professional_name.trim().to_string(),
                category: self.category.clone(),
                category_id: category.map(|c| c.id.to_string()),
                status: self.status,
                modality: self.modality,
                notes: self.notes.clone(),
                source,
            },
        }
    }
}

fn with_time(value: NaiveDateTime, hhmm: &str) -> Result<NaiveDateTime, CalendarError> {
    dates::parse_time(hhmm)
        .map(|t| value.date().and_time(t))
        .ok_or_else(|| CalendarError::InvalidForm(format!("horário inválido: {}", hhmm)))
}

/// Masks a patient name for the details panel: `Maria Aparecida Souza`
/// becomes `M*** *** S***`.
pub fn mask_name(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    let last = parts.len().saturating_sub(1);

    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i == 0 || i == last {
                let initial: String = part.chars().take(1).collect();
                format!("{}***", initial)
            } else {
                "***".to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, 3).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn filled() -> EventForm {
        let mut form = EventForm::from_slot(at(8, 0), at(9, 0));
        form.title = "Retorno".to_string();
        form.patient_name = "Maria".to_string();
        form.professional_name = "Dra. Helena".to_string();
        form.set_category("Cardiologia");
        form.set_status(Some(AppointmentStatus::Agendada));
        form
    }

    #[test]
    fn test_category_sets_color() {
        let mut form = filled();
        assert_eq!(form.color, "#dc2626");

        form.set_category("Podologia");
        assert_eq!(form.color, "");
        assert_eq!(form.to_event("1".into(), None).color, FALLBACK_COLOR);
    }

    #[test]
    fn test_status_change_clears_modality() {
        let mut form = filled();
        form.set_status(Some(AppointmentStatus::Realizada));
        form.modality = Some(Modality::Teleconsulta);

        form.set_status(Some(AppointmentStatus::Realizada));
        assert_eq!(form.modality, Some(Modality::Teleconsulta));

        form.set_status(Some(AppointmentStatus::Cancelada));
        assert_eq!(form.modality, None);
    }

    #[test]
    fn test_set_time_keeps_date() {
        let mut form = filled();
        form.set_end_time("10:45").unwrap();

        assert_eq!(form.end, at(10, 45));
        assert_matches!(form.set_start_time("8h"), Err(CalendarError::InvalidForm(_)));
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(filled().validate().is_ok());

        let mut form = filled();
        form.patient_name = "  ".to_string();
        assert_matches!(form.validate(), Err(CalendarError::InvalidForm(msg)) if msg.contains("paciente"));

        let mut form = filled();
        form.set_status(Some(AppointmentStatus::Realizada));
        assert_matches!(form.validate(), Err(CalendarError::InvalidForm(msg)) if msg.contains("modalidade"));
    }

    #[test]
    fn test_validate_end_after_start() {
        let mut form = filled();
        form.end = form.start;
        assert_matches!(form.validate(), Err(CalendarError::InvalidForm(_)));
    }

    #[test]
    fn test_mask_name() {
        assert_eq!(mask_name("Maria Aparecida Souza"), "M*** *** S***");
        assert_eq!(mask_name("Maria"), "M***");
        assert_eq!(mask_name(""), "");
    }
}
