use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// Upper bound of the absenteeism risk score scale.
pub const MAX_RISK_SCORE: u32 = 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    #[serde(alias = "CRÍTICO")]
    Critico,
    Alto,
    #[serde(alias = "MÉDIO")]
    Medio,
    Baixo,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Critico,
        RiskLevel::Alto,
        RiskLevel::Medio,
        RiskLevel::Baixo,
    ];

    /// Classifies a raw score with the dashboard card thresholds.
    pub fn from_score(score: u32) -> Self {
        if score > 850 {
            RiskLevel::Critico
        } else if score > 700 {
            RiskLevel::Alto
        } else if score > 400 {
            RiskLevel::Medio
        } else {
            RiskLevel::Baixo
        }
    }

    /// Reads a level as the backend spells it, ignoring case, surrounding
    /// whitespace and accents on CRÍTICO/MÉDIO.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "CRITICO" | "CRÍTICO" => Some(RiskLevel::Critico),
            "ALTO" => Some(RiskLevel::Alto),
            "MEDIO" | "MÉDIO" => Some(RiskLevel::Medio),
            "BAIXO" => Some(RiskLevel::Baixo),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Critico => "Crítico",
            RiskLevel::Alto => "Alto",
            RiskLevel::Medio => "Medio",
            RiskLevel::Baixo => "Baixo",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Critico => write!(f, "CRITICO"),
            RiskLevel::Alto => write!(f, "ALTO"),
            RiskLevel::Medio => write!(f, "MEDIO"),
            RiskLevel::Baixo => write!(f, "BAIXO"),
        }
    }
}

/// Deserializes an optional risk level. Unknown spellings become `None`
/// instead of failing the enclosing record.
pub fn lenient_level<'de, D>(deserializer: D) -> Result<Option<RiskLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        let parsed = RiskLevel::parse_lenient(&value);
        if parsed.is_none() {
            debug!("Unrecognized risk level {:?}", value);
        }
        parsed
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_thresholds() {
        assert_eq!(RiskLevel::from_score(1000), RiskLevel::Critico);
        assert_eq!(RiskLevel::from_score(851), RiskLevel::Critico);
        assert_eq!(RiskLevel::from_score(850), RiskLevel::Alto);
        assert_eq!(RiskLevel::from_score(701), RiskLevel::Alto);
        assert_eq!(RiskLevel::from_score(700), RiskLevel::Medio);
        assert_eq!(RiskLevel::from_score(401), RiskLevel::Medio);
        assert_eq!(RiskLevel::from_score(400), RiskLevel::Baixo);
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Baixo);
    }

    #[test]
    fn test_wire_format() {
        let level: RiskLevel = serde_json::from_str("\"CRITICO\"").unwrap();
        assert_eq!(level, RiskLevel::Critico);
        assert_eq!(serde_json::to_string(&RiskLevel::Medio).unwrap(), "\"MEDIO\"");
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(RiskLevel::parse_lenient(" alto "), Some(RiskLevel::Alto));
        assert_eq!(RiskLevel::parse_lenient("Crítico"), Some(RiskLevel::Critico));
        assert_eq!(RiskLevel::parse_lenient("médio"), Some(RiskLevel::Medio));
        assert_eq!(RiskLevel::parse_lenient("urgente"), None);
    }
}
