//! Static catalog of consultation specialties shown in the calendar filters
//! and offered by the manual upload form.

use serde::Serialize;

/// Color used for specialties that are not in the catalog.
pub const FALLBACK_COLOR: &str = "#6b7280";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SpecialtyCategory {
    pub id: &'static str,
    pub title: &'static str,
    pub color: &'static str,
}

pub const CATEGORIES: [SpecialtyCategory; 14] = [
    SpecialtyCategory { id: "cardio", title: "Cardiologia", color: "#dc2626" },
    SpecialtyCategory { id: "enfermagem", title: "Enfermagem", color: "#2563eb" },
    SpecialtyCategory { id: "fisiatria", title: "Fisiatria", color: "#f59e0b" },
    SpecialtyCategory { id: "fisioterapia", title: "Fisioterapia", color: "#10b981" },
    SpecialtyCategory { id: "fono", title: "Fonoaudiologia", color: "#9333ea" },
    SpecialtyCategory { id: "infecto", title: "Infectologia", color: "#f43f5e" },
    SpecialtyCategory { id: "sono", title: "Medicina do Sono", color: "#0ea5e9" },
    SpecialtyCategory { id: "neuro", title: "Neurologia", color: "#7c3aed" },
    SpecialtyCategory { id: "nutri", title: "Nutrição", color: "#84cc16" },
    SpecialtyCategory { id: "odonto", title: "Odontologia", color: "#14b8a6" },
    SpecialtyCategory { id: "psico", title: "Psicologia", color: "#3b5280" },
    SpecialtyCategory { id: "psiquiatria", title: "Psiquiatria", color: "#e11d48" },
    SpecialtyCategory { id: "to", title: "Terapia Ocupacional", color: "#3b82f6" },
    SpecialtyCategory { id: "uro", title: "Urologia", color: "#6366f1" },
];

/// Looks a specialty up by its display title, ignoring case, accents and
/// surrounding whitespace.
pub fn find_by_title(title: &str) -> Option<&'static SpecialtyCategory> {
    let wanted = normalize(title);
    if wanted.is_empty() {
        return None;
    }
    CATEGORIES.iter().find(|c| normalize(c.title) == wanted)
}

pub fn find_by_id(id: &str) -> Option<&'static SpecialtyCategory> {
    CATEGORIES.iter().find(|c| c.id == id)
}

pub fn color_for_specialty(title: &str) -> &'static str {
    find_by_title(title).map(|c| c.color).unwrap_or(FALLBACK_COLOR)
}

pub fn all_ids() -> impl Iterator<Item = &'static str> {
    CATEGORIES.iter().map(|c| c.id)
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case_and_accents() {
        assert_eq!(find_by_title("Nutrição").map(|c| c.id), Some("nutri"));
        assert_eq!(find_by_title("nutricao").map(|c| c.id), Some("nutri"));
        assert_eq!(find_by_title("  CARDIOLOGIA ").map(|c| c.id), Some("cardio"));
        assert!(find_by_title("").is_none());
    }

    #[test]
    fn test_unknown_specialty_uses_fallback_color() {
        assert_eq!(color_for_specialty("Dermatologia"), FALLBACK_COLOR);
        assert_eq!(color_for_specialty("Urologia"), "#6366f1");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = all_ids().collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), CATEGORIES.len());
    }
}
