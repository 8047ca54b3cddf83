// =====================================================================================
// UPLOAD MODELS
// =====================================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use shared_models::AppError;

/// One imported spreadsheet row, column name to value, in column order.
pub type UploadRow = Map<String, Value>;

/// A cell of the validation grid.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub key: String,
}

impl CellRef {
    pub fn new(row: usize, key: impl Into<String>) -> Self {
        Self { row, key: key.into() }
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registro {}, campo {}", self.row + 1, self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WizardStep {
    Upload,
    Validate,
    Finalize,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Upload => 1,
            WizardStep::Validate => 2,
            WizardStep::Finalize => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Upload => "Realizando o Upload",
            WizardStep::Validate => "Validando",
            WizardStep::Finalize => "Finalização",
        }
    }

    /// Step implied by the drafts on disk.
    pub fn from_drafts(has_pending: bool, has_finalized: bool) -> Self {
        match (has_pending, has_finalized) {
            (true, _) => WizardStep::Validate,
            (false, true) => WizardStep::Finalize,
            (false, false) => WizardStep::Upload,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}

/// Handle for undoing a row deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UndoToken(pub Uuid);

impl fmt::Display for UndoToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UndoToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(UndoToken)
    }
}

/// A deleted row remembered until it is restored or the draft is cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedRow {
    pub token: UndoToken,
    pub index: usize,
    pub row: UploadRow,
}

/// Row produced by the manual entry form, in the save endpoint's format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualUploadRow {
    pub nome_medico: String,
    pub data_agendamento: String,
    pub hora_agendamento: String,
    pub nome_paciente: String,
    pub numero_paciente: String,
    pub data_nascimento_paciente: String,
    pub afinidade_digital: u64,
    pub nome_acompanhante: String,
    pub numero_acompanhante: String,
    pub especialidade: String,
    pub codigo_consulta: u64,
    pub obs_agendamento: String,
    pub cep: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No rows waiting for validation")]
    NothingToValidate,

    #[error("Row {0} does not exist")]
    RowOutOfRange(usize),

    #[error("Nothing to undo for {0}")]
    UnknownUndo(UndoToken),

    #[error("Required fields are empty: {}", .0.len())]
    MissingFields(Vec<CellRef>),

    #[error("Invalid form: {}", .0.join("; "))]
    InvalidForm(Vec<String>),

    #[error(transparent)]
    Api(#[from] AppError),
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Api(AppError::from(err))
    }
}

impl From<serde_json::Error> for UploadError {
    fn from(err: serde_json::Error) -> Self {
        UploadError::Api(AppError::from(err))
    }
}
