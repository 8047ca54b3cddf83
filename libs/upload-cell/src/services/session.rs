// =====================================================================================
// VALIDATION SESSION - EDIT, DELETE, UNDO AND FINISH PENDING ROWS
// =====================================================================================

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::models::{CellRef, DeletedRow, UndoToken, UploadError, UploadRow};
use crate::services::drafts::DraftStore;
use crate::services::upload::UploadService;
use crate::services::validation::RowValidator;

pub const ROWS_PER_PAGE: usize = 5;

/// One page of the validation grid. `number` is 1-based.
#[derive(Debug, PartialEq)]
pub struct Page<'a> {
    pub number: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub rows: &'a [UploadRow],
}

/// Working copy of the pending rows. Every change is written back to the
/// draft store before returning.
#[derive(Debug)]
pub struct ValidationSession {
    store: DraftStore,
    uploads: UploadService,
    rows: Vec<UploadRow>,
    errors: BTreeSet<CellRef>,
}

impl ValidationSession {
    /// Saves parsed spreadsheet rows as the pending draft.
    #[instrument(skip(store, rows), fields(count = rows.len()))]
    pub async fn stage(store: &DraftStore, rows: Vec<UploadRow>) -> Result<(), UploadError> {
        if rows.is_empty() {
            return Err(UploadError::NothingToValidate);
        }
        store.save_deleted(&[]).await?;
        store.save_pending(&rows).await?;
        info!("Staged {} rows for validation", rows.len());
        Ok(())
    }

    /// Reads a JSON array of objects, as produced by the spreadsheet parser.
    pub fn parse_rows(json: &str) -> Result<Vec<UploadRow>, UploadError> {
        let rows: Vec<UploadRow> = serde_json::from_str(json)?;
        Ok(rows)
    }

    /// Opens the pending draft. Fails when nothing is pending.
    pub async fn open(store: DraftStore, uploads: UploadService) -> Result<Self, UploadError> {
        let rows = match store.load_pending().await? {
            Some(rows) if !rows.is_empty() => rows,
            _ => return Err(UploadError::NothingToValidate),
        };

        Ok(Self {
            store,
            uploads,
            rows,
            errors: BTreeSet::new(),
        })
    }

    pub fn rows(&self) -> &[UploadRow] {
        &self.rows
    }

    pub fn errors(&self) -> &BTreeSet<CellRef> {
        &self.errors
    }

    pub fn headers(&self) -> Vec<String> {
        RowValidator::headers(&self.rows)
    }

    pub fn total_pages(&self) -> usize {
        self.rows.len().div_ceil(ROWS_PER_PAGE).max(1)
    }

    /// Page `number` (1-based), clamped to the available pages.
    pub fn page(&self, number: usize) -> Page<'_> {
        let total_pages = self.total_pages();
        let number = number.clamp(1, total_pages);
        let start_index = ((number - 1) * ROWS_PER_PAGE).min(self.rows.len());
        let end = (start_index + ROWS_PER_PAGE).min(self.rows.len());

        Page {
            number,
            total_pages,
            start_index,
            rows: &self.rows[start_index..end],
        }
    }

    /// Masks and stores a cell value, updating that cell's error flag.
    /// Returns the stored value.
    pub async fn edit_cell(&mut self, row: usize, key: &str, value: &str) -> Result<String, UploadError> {
        let masked = RowValidator::apply_mask(key, value);
        let target = self.rows.get_mut(row).ok_or(UploadError::RowOutOfRange(row))?;
        target.insert(key.to_string(), Value::String(masked.clone()));

        let cell = CellRef::new(row, key);
        if RowValidator::is_invalid(key, target.get(key)) {
            self.errors.insert(cell);
        } else {
            self.errors.remove(&cell);
        }

        self.store.save_pending(&self.rows).await?;
        Ok(masked)
    }

    /// Removes a row and returns a token that restores it.
    pub async fn delete_row(&mut self, row: usize) -> Result<UndoToken, UploadError> {
        if row >= self.rows.len() {
            return Err(UploadError::RowOutOfRange(row));
        }
        let removed = self.rows.remove(row);
        self.shift_errors_after_delete(row);

        let token = UndoToken(Uuid::new_v4());
        let mut deleted = self.store.load_deleted().await?;
        deleted.push(DeletedRow {
            token,
            index: row,
            row: removed,
        });

        self.store.save_pending(&self.rows).await?;
        self.store.save_deleted(&deleted).await?;
        info!("Row {} removed, undo token {}", row + 1, token);
        Ok(token)
    }

    /// Puts a deleted row back at its original index, or at the end when
    /// the grid has since become shorter.
    pub async fn undo(&mut self, token: UndoToken) -> Result<usize, UploadError> {
        let mut deleted = self.store.load_deleted().await?;
        let pos = deleted
            .iter()
            .position(|d| d.token == token)
            .ok_or(UploadError::UnknownUndo(token))?;
        let entry = deleted.remove(pos);

        let index = entry.index.min(self.rows.len());
        self.rows.insert(index, entry.row);
        self.shift_errors_after_insert(index);

        self.store.save_pending(&self.rows).await?;
        self.store.save_deleted(&deleted).await?;
        info!("Row {} restored", index + 1);
        Ok(index)
    }

    /// Validates every cell. With no errors, sends all rows to the backend,
    /// keeps its answer as the finalized draft and clears the pending one.
    /// With errors, nothing is sent.
    #[instrument(skip(self), fields(rows = self.rows.len()))]
    pub async fn finish(&mut self) -> Result<Vec<UploadRow>, UploadError> {
        self.errors = RowValidator::invalid_cells(&self.rows, &self.headers());
        if !self.errors.is_empty() {
            warn!("{} required cells are empty", self.errors.len());
            return Err(UploadError::MissingFields(self.errors.iter().cloned().collect()));
        }

        let saved = self.uploads.save_rows(&self.rows).await?;

        // Rows are on the server from here on; draft failures are only logged.
        if let Err(e) = self.store.clear_pending().await {
            warn!("Rows saved but pending draft was not cleared: {}", e);
        }
        if let Err(e) = self.store.save_finalized(&saved).await {
            warn!("Rows saved but finalized draft was not written: {}", e);
        }
        info!("{} rows saved", saved.len());
        Ok(saved)
    }

    /// Abandons validation and returns to the upload step.
    pub async fn back_to_upload(self) -> Result<(), UploadError> {
        self.store.clear_pending().await?;
        info!("Pending upload discarded");
        Ok(())
    }

    fn shift_errors_after_delete(&mut self, removed: usize) {
        self.errors = std::mem::take(&mut self.errors)
            .into_iter()
            .filter(|c| c.row != removed)
            .map(|c| if c.row > removed { CellRef::new(c.row - 1, c.key) } else { c })
            .collect();
    }

    fn shift_errors_after_insert(&mut self, inserted: usize) {
        self.errors = std::mem::take(&mut self.errors)
            .into_iter()
            .map(|c| if c.row >= inserted { CellRef::new(c.row + 1, c.key) } else { c })
            .collect();
    }
}
