// =====================================================================================
// ROW VALIDATION - REQUIRED CELLS, INPUT MASKS AND HEADERS
// =====================================================================================

use std::collections::BTreeSet;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use shared_utils::masks::digits_only;

use crate::models::{CellRef, UploadRow};

/// Columns that may be left blank.
pub const OPTIONAL_KEYS: [&str; 4] = ["nomeAcompanhante", "numeroAcompanhante", "obsAgendamento", "OBS"];

pub struct RowValidator {
    camel_boundary: Option<Regex>,
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RowValidator {
    pub fn new() -> Self {
        Self {
            camel_boundary: Regex::new(r"([A-Z])").ok(),
        }
    }

    pub fn is_optional(key: &str) -> bool {
        OPTIONAL_KEYS.contains(&key)
    }

    /// A required cell is invalid when missing, null or blank.
    pub fn is_invalid(key: &str, value: Option<&Value>) -> bool {
        if Self::is_optional(key) {
            return false;
        }
        match value {
            None | Some(Value::Null) => true,
            Some(v) => cell_text(v).trim().is_empty(),
        }
    }

    /// Every invalid cell of `rows` across the given headers.
    pub fn invalid_cells(rows: &[UploadRow], headers: &[String]) -> BTreeSet<CellRef> {
        let mut cells = BTreeSet::new();
        for (i, row) in rows.iter().enumerate() {
            for key in headers {
                if Self::is_invalid(key, row.get(key)) {
                    cells.insert(CellRef::new(i, key.clone()));
                }
            }
        }
        debug!("Validated {} rows, {} invalid cells", rows.len(), cells.len());
        cells
    }

    /// Union of the row keys, in first-seen order.
    pub fn headers(rows: &[UploadRow]) -> Vec<String> {
        let mut headers: Vec<String> = Vec::new();
        for key in rows.iter().flat_map(|row| row.keys()) {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
        headers
    }

    /// `dataAgendamento` becomes `Data Agendamento`.
    pub fn format_header(&self, key: &str) -> String {
        let spaced = match &self.camel_boundary {
            Some(re) => re.replace_all(key, " $1").into_owned(),
            None => key.to_string(),
        };
        let spaced = spaced.trim();

        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Applies the input mask that matches the column name. Phone-like
    /// `numero*` columns, `cep`, `data*` and `hora*` are masked; other
    /// columns are returned unchanged.
    pub fn apply_mask(key: &str, value: &str) -> String {
        let lower = key.to_lowercase();

        if lower.contains("numero") {
            let digits = take(&digits_only(value), 11);
            let mut masked = if digits.len() > 2 {
                format!("({}) {}", &digits[..2], &digits[2..])
            } else {
                digits
            };
            if masked.len() > 9 {
                masked = format!("{}-{}", &masked[..10], &masked[10..]);
            }
            return masked;
        }

        if key == "cep" {
            let digits = take(&digits_only(value), 8);
            if digits.len() > 5 {
                return format!("{}-{}", &digits[..5], &digits[5..]);
            }
            return digits;
        }

        if lower.contains("data") {
            let digits = take(&digits_only(value), 8);
            let mut masked = if digits.len() > 2 {
                format!("{}/{}", &digits[..2], &digits[2..])
            } else {
                digits
            };
            if masked.len() > 5 {
                masked = format!("{}/{}", &masked[..5], &masked[5..]);
            }
            return masked;
        }

        if lower.contains("hora") {
            let digits = take(&digits_only(value), 4);
            if digits.len() > 2 {
                return format!("{}:{}", &digits[..2], &digits[2..]);
            }
            return digits;
        }

        value.to_string()
    }
}

/// Text shown in a grid cell.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn take(digits: &str, max: usize) -> String {
    digits.chars().take(max).collect()
}
