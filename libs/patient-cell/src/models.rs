use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use shared_models::ids::string_or_number;
use shared_models::risk::{lenient_level, MAX_RISK_SCORE};
use shared_models::RiskLevel;
use shared_utils::dates;

/// Patient identification, risk score and timeline as returned by
/// `/api/paciente/{id}/historico`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id_paciente: String,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub data_nascimento: String,
    #[serde(default)]
    pub score_de_risco: Option<u32>,
    #[serde(default, deserialize_with = "lenient_level")]
    pub nivel_de_risco: Option<RiskLevel>,
    #[serde(default)]
    pub linha_do_tempo: Vec<TimelineEntry>,
}

impl PatientRecord {
    pub fn risk_card(&self) -> Option<RiskScoreCard> {
        Some(RiskScoreCard {
            score: self.score_de_risco?,
            level: self.nivel_de_risco?,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimelineKind {
    #[serde(rename = "ANOTACAO_EQUIPE")]
    StaffNote,
    #[serde(rename = "CONSULTA")]
    Consultation,
    #[serde(rename = "ALERTA")]
    Alert,
}

impl TimelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimelineKind::StaffNote => "ANOTACAO_EQUIPE",
            TimelineKind::Consultation => "CONSULTA",
            TimelineKind::Alert => "ALERTA",
        }
    }
}

impl fmt::Display for TimelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "tipo")]
pub enum TimelineEntry {
    #[serde(rename = "ANOTACAO_EQUIPE")]
    StaffNote(StaffNote),
    #[serde(rename = "CONSULTA")]
    Consultation(ConsultationEntry),
    #[serde(rename = "ALERTA")]
    Alert(AlertEntry),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaffNote {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub data: String,
    #[serde(default)]
    pub hora: String,
    #[serde(default)]
    pub anotacao: String,
    #[serde(default)]
    pub id_usuario: String,
    #[serde(default)]
    pub nome_usuario: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub data: String,
    #[serde(default)]
    pub hora: String,
    #[serde(default)]
    pub especialidade: String,
    #[serde(default)]
    pub nome_medico: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub data: String,
    #[serde(default)]
    pub hora: String,
    #[serde(default)]
    pub mensagem: String,
    #[serde(default)]
    pub score_de_risco: Option<u32>,
}

impl TimelineEntry {
    pub fn kind(&self) -> TimelineKind {
        match self {
            TimelineEntry::StaffNote(_) => TimelineKind::StaffNote,
            TimelineEntry::Consultation(_) => TimelineKind::Consultation,
            TimelineEntry::Alert(_) => TimelineKind::Alert,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            TimelineEntry::StaffNote(e) => &e.id,
            TimelineEntry::Consultation(e) => &e.id,
            TimelineEntry::Alert(e) => &e.id,
        }
    }

    fn date_and_time(&self) -> (&str, &str) {
        match self {
            TimelineEntry::StaffNote(e) => (&e.data, &e.hora),
            TimelineEntry::Consultation(e) => (&e.data, &e.hora),
            TimelineEntry::Alert(e) => (&e.data, &e.hora),
        }
    }

    /// `data` + `hora` as a timestamp; `None` when either is unreadable.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let (data, hora) = self.date_and_time();
        dates::combine_date_time(data, Some(hora))
    }

    /// One-line description for listings.
    pub fn summary(&self) -> String {
        match self {
            TimelineEntry::StaffNote(e) => format!("{}: {}", e.nome_usuario, e.anotacao),
            TimelineEntry::Consultation(e) => {
                format!("{} com {} ({})", e.especialidade, e.nome_medico, e.status)
            }
            TimelineEntry::Alert(e) => match e.score_de_risco {
                Some(score) => format!("{} [score {}]", e.mensagem, score),
                None => e.mensagem.clone(),
            },
        }
    }
}

/// Risk score panel of the history page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskScoreCard {
    pub score: u32,
    pub level: RiskLevel,
}

impl fmt::Display for RiskScoreCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.score, MAX_RISK_SCORE, self.level.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_utils::test_utils::MockApiResponses;

    #[test]
    fn test_decodes_tagged_timeline() {
        let record: PatientRecord = serde_json::from_value(MockApiResponses::patient_record("42")).unwrap();

        assert_eq!(record.id_paciente, "42");
        let kinds: Vec<TimelineKind> = record.linha_do_tempo.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec![TimelineKind::Consultation, TimelineKind::StaffNote, TimelineKind::Alert]);
        assert_eq!(record.linha_do_tempo[1].id(), "a-1");
        assert_eq!(
            record.linha_do_tempo[1].timestamp().map(|t| t.to_string()),
            Some("2025-09-12 14:30:00".to_string())
        );
    }

    #[test]
    fn test_risk_card_needs_score_and_level() {
        let mut record: PatientRecord = serde_json::from_value(json!({ "idPaciente": 1 })).unwrap();
        assert_eq!(record.risk_card(), None);

        record.score_de_risco = Some(780);
        assert_eq!(record.risk_card(), None);

        record.nivel_de_risco = Some(RiskLevel::Alto);
        assert_eq!(record.risk_card().map(|c| c.to_string()), Some("780/1000 Alto".to_string()));
    }
}
