// =====================================================================================
// ALERT MODELS
// =====================================================================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use shared_models::ids::string_or_number;
use shared_models::risk::lenient_level;
use shared_models::RiskLevel;

/// One of today's appointments flagged with an absenteeism risk score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAlert {
    #[serde(deserialize_with = "string_or_number")]
    pub id_paciente: String,
    #[serde(default)]
    pub nome_paciente: String,
    #[serde(default)]
    pub telefone_paciente: String,
    #[serde(default)]
    pub score_de_risco: u32,
    #[serde(default, deserialize_with = "lenient_level")]
    pub nivel_de_risco: Option<RiskLevel>,
    #[serde(default)]
    pub hora_consulta: String,
    #[serde(default)]
    pub nome_medico: String,
    #[serde(default)]
    pub especialidade_consulta: String,
}

impl RiskAlert {
    /// Level reported by the backend, or derived from the score when absent.
    pub fn effective_level(&self) -> RiskLevel {
        self.nivel_de_risco
            .unwrap_or_else(|| RiskLevel::from_score(self.score_de_risco))
    }

    /// Level shown on the consultation card, always derived from the score.
    pub fn score_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score_de_risco)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LevelCount {
    pub level: RiskLevel,
    pub label: &'static str,
    pub count: usize,
}

/// Aggregates behind the dashboard cards and the level distribution chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub total_scheduled: usize,
    pub by_level: Vec<LevelCount>,
    /// Today's consultations, highest score first.
    pub consultations: Vec<RiskAlert>,
}

impl DashboardSummary {
    pub fn from_alerts(alerts: &[RiskAlert]) -> Self {
        let by_level = RiskLevel::ALL
            .iter()
            .map(|level| LevelCount {
                level: *level,
                label: level.label(),
                count: alerts.iter().filter(|a| a.effective_level() == *level).count(),
            })
            .collect();

        let mut consultations = alerts.to_vec();
        consultations.sort_by(|a, b| b.score_de_risco.cmp(&a.score_de_risco));

        Self {
            total_scheduled: alerts.len(),
            by_level,
            consultations,
        }
    }

    pub fn count(&self, level: RiskLevel) -> usize {
        self.by_level
            .iter()
            .find(|c| c.level == level)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// Snapshot published by the poller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// `None` until the first successful load.
    pub alerts: Option<Vec<RiskAlert>>,
    pub loading: bool,
    pub refreshed_at: Option<NaiveDateTime>,
}

impl DashboardState {
    pub fn summary(&self) -> Option<DashboardSummary> {
        self.alerts.as_deref().map(DashboardSummary::from_alerts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alert(id: &str, score: u32, level: Option<&str>) -> RiskAlert {
        serde_json::from_value(json!({
            "idPaciente": id,
            "nomePaciente": format!("Paciente {}", id),
            "scoreDeRisco": score,
            "nivelDeRisco": level,
        }))
        .unwrap()
    }

    #[test]
    fn test_effective_level_prefers_reported() {
        assert_eq!(alert("1", 900, Some("BAIXO")).effective_level(), RiskLevel::Baixo);
        assert_eq!(alert("1", 900, Some("BAIXO")).score_level(), RiskLevel::Critico);
        assert_eq!(alert("2", 720, None).effective_level(), RiskLevel::Alto);
        assert_eq!(alert("3", 500, Some("desconhecido")).effective_level(), RiskLevel::Medio);
    }

    #[test]
    fn test_numeric_patient_id() {
        let alert: RiskAlert = serde_json::from_value(json!({ "idPaciente": 17, "scoreDeRisco": 10 })).unwrap();
        assert_eq!(alert.id_paciente, "17");
        assert_eq!(alert.nivel_de_risco, None);
    }

    #[test]
    fn test_summary_counts_and_order() {
        let alerts = vec![
            alert("a", 300, Some("BAIXO")),
            alert("b", 950, Some("CRITICO")),
            alert("c", 760, None),
            alert("d", 910, Some("CRITICO")),
        ];
        let summary = DashboardSummary::from_alerts(&alerts);

        assert_eq!(summary.total_scheduled, 4);
        assert_eq!(summary.count(RiskLevel::Critico), 2);
        assert_eq!(summary.count(RiskLevel::Alto), 1);
        assert_eq!(summary.count(RiskLevel::Medio), 0);
        assert_eq!(summary.count(RiskLevel::Baixo), 1);

        let order: Vec<&str> = summary.consultations.iter().map(|a| a.id_paciente.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_empty_state_has_no_summary() {
        assert_eq!(DashboardState::default().summary(), None);

        let state = DashboardState {
            alerts: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(state.summary().map(|s| s.total_scheduled), Some(0));
    }
}
