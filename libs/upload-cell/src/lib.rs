// =====================================================================================
// UPLOAD CELL - SPREADSHEET IMPORT WIZARD AND MANUAL ENTRY
// =====================================================================================

pub mod models;
pub mod services;

pub use models::{CellRef, ManualUploadRow, UndoToken, UploadError, UploadRow, WizardStep};
pub use services::drafts::DraftStore;
pub use services::manual::ManualEntryForm;
pub use services::session::{Page, ValidationSession};
pub use services::upload::UploadService;
pub use services::validation::RowValidator;
