// =====================================================================================
// MANUAL ENTRY - SINGLE APPOINTMENT TYPED IN BY STAFF
// =====================================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use shared_models::catalog;
use shared_utils::dates;
use shared_utils::masks::{digits_only, mask_cep, mask_phone};

use crate::models::{ManualUploadRow, UploadError, UploadRow};
use crate::services::upload::UploadService;

/// Earliest accepted birth date.
const BIRTH_DATE_MIN: (i32, u32, u32) = (2000, 1, 1);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualEntryForm {
    /// `yyyy-mm-dd` or `dd/mm/yyyy`.
    pub appointment_date: String,
    pub appointment_time: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub birth_date: String,
    pub digital_affinity: u64,
    pub companion_name: String,
    pub companion_phone: String,
    pub doctor_name: String,
    pub specialty: String,
    pub code: u64,
    pub notes: String,
    pub cep: String,
}

impl ManualEntryForm {
    pub fn set_patient_phone(&mut self, value: &str) {
        self.patient_phone = mask_phone(value);
    }

    pub fn set_companion_phone(&mut self, value: &str) {
        self.companion_phone = mask_phone(value);
    }

    pub fn set_cep(&mut self, value: &str) {
        self.cep = mask_cep(value);
    }

    /// Keeps only the digits. Numbers that do not fit are rejected and leave
    /// the field unchanged.
    pub fn set_code(&mut self, value: &str) -> Result<(), UploadError> {
        self.code = numeric("código da consulta", value)?;
        Ok(())
    }

    pub fn set_digital_affinity(&mut self, value: &str) -> Result<(), UploadError> {
        self.digital_affinity = numeric("afinidade digital", value)?;
        Ok(())
    }

    /// Collects every problem with the form; `today` bounds both dates.
    pub fn validate(&self, today: NaiveDate) -> Result<(), UploadError> {
        let mut problems = Vec::new();

        match dates::parse_date(&self.appointment_date) {
            None if self.appointment_date.trim().is_empty() => {
                problems.push("data do agendamento é obrigatória".to_string())
            }
            None => problems.push(format!("data do agendamento inválida: {}", self.appointment_date)),
            Some(date) if date < today => {
                problems.push("data do agendamento não pode estar no passado".to_string())
            }
            Some(_) => {}
        }

        if dates::parse_time(&self.appointment_time).is_none() {
            problems.push("hora do agendamento é obrigatória (HH:MM)".to_string());
        }

        for (label, value) in [
            ("nome do paciente", &self.patient_name),
            ("número do paciente", &self.patient_phone),
            ("nome do médico", &self.doctor_name),
        ] {
            if value.trim().is_empty() {
                problems.push(format!("{} é obrigatório", label));
            }
        }

        if catalog::find_by_title(&self.specialty).is_none() {
            problems.push(format!("especialidade desconhecida: {}", self.specialty));
        }

        if !self.birth_date.trim().is_empty() {
            let min = NaiveDate::from_ymd_opt(BIRTH_DATE_MIN.0, BIRTH_DATE_MIN.1, BIRTH_DATE_MIN.2);
            match dates::parse_date(&self.birth_date) {
                Some(date) if Some(date) >= min && date <= today => {}
                _ => problems.push(format!("data de nascimento fora do intervalo: {}", self.birth_date)),
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(UploadError::InvalidForm(problems))
        }
    }

    /// Row in the save endpoint's format: dates as `dd/mm/yyyy`, phone
    /// numbers and CEP as bare digits.
    pub fn to_payload(&self) -> ManualUploadRow {
        ManualUploadRow {
            nome_medico: self.doctor_name.trim().to_string(),
            data_agendamento: br_date(&self.appointment_date),
            hora_agendamento: self.appointment_time.trim().to_string(),
            nome_paciente: self.patient_name.trim().to_string(),
            numero_paciente: digits_only(&self.patient_phone),
            data_nascimento_paciente: br_date(&self.birth_date),
            afinidade_digital: self.digital_affinity,
            nome_acompanhante: self.companion_name.trim().to_string(),
            numero_acompanhante: digits_only(&self.companion_phone),
            especialidade: catalog::find_by_title(&self.specialty)
                .map(|c| c.title.to_string())
                .unwrap_or_else(|| self.specialty.clone()),
            codigo_consulta: self.code,
            obs_agendamento: self.notes.clone(),
            cep: digits_only(&self.cep),
        }
    }

    /// Validates, then sends the form as a one-row upload.
    #[instrument(skip(self, uploads))]
    pub async fn submit(&self, uploads: &UploadService, today: NaiveDate) -> Result<Vec<UploadRow>, UploadError> {
        self.validate(today)?;
        let saved = uploads.save_rows(&[self.to_payload()]).await?;
        info!("Manual entry saved");
        Ok(saved)
    }
}

/// Blank input is zero.
fn numeric(label: &str, value: &str) -> Result<u64, UploadError> {
    let digits = digits_only(value);
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse()
        .map_err(|_| UploadError::InvalidForm(vec![format!("{} fora do limite: {}", label, value.trim())]))
}

fn br_date(value: &str) -> String {
    dates::parse_date(value).map(dates::format_br_date).unwrap_or_default()
}
