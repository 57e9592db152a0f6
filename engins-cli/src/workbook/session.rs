//! In-memory workbook session
//!
//! Explicit state instead of hidden shared mutability: loading normalizes
//! every recognized sheet once, edits go through the validate-then-apply
//! path, and saving rewrites the workbook replacing only the sheets edited
//! in this session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::workbook::dataset::Dataset;
use crate::workbook::edit::{self, ValidatedEdit};
use crate::workbook::excel::{WorkbookFile, save_workbook};
use crate::workbook::normalize::normalize_sheet;
use crate::workbook::schema::{SchemaRegistry, SheetSchema};

/// One loaded sheet
pub struct SheetState {
    pub name: String,
    pub dataset: Dataset,
    /// Edited since load (or last save); dirty sheets are rewritten from
    /// their dataset on save
    pub dirty: bool,
}

/// A workbook loaded, normalized and held for the session
pub struct WorkbookSession {
    path: PathBuf,
    registry: SchemaRegistry,
    sheets: Vec<SheetState>,
}

impl WorkbookSession {
    /// Open a workbook and normalize every sheet that has a registered schema
    pub fn load(path: impl Into<PathBuf>, registry: SchemaRegistry) -> Result<Self> {
        let path = path.into();
        let file = WorkbookFile::open(&path)?;

        let mut sheets = Vec::new();
        for name in file.sheet_names() {
            let dataset = match registry.get(&name) {
                Some(schema) => {
                    let grid = file.raw_grid(&name);
                    normalize_sheet(&grid, schema, |skip| Ok(file.headed_table(&name, skip)))?
                }
                None => {
                    log::warn!("Unknown sheet: {}, skipping normalization", name);
                    Dataset::empty()
                }
            };
            sheets.push(SheetState {
                name,
                dataset,
                dirty: false,
            });
        }

        Ok(WorkbookSession {
            path,
            registry,
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheets(&self) -> &[SheetState] {
        &self.sheets
    }

    pub fn schema(&self, sheet: &str) -> Option<&SheetSchema> {
        self.registry.get(sheet)
    }

    pub fn dataset(&self, sheet: &str) -> Option<&Dataset> {
        self.sheets
            .iter()
            .find(|s| s.name == sheet)
            .map(|s| &s.dataset)
    }

    /// Schema and dataset for a sheet, or a user-facing error
    pub fn sheet_context(&self, sheet: &str) -> Result<(&SheetSchema, &Dataset)> {
        let schema = self
            .registry
            .get(sheet)
            .ok_or_else(|| anyhow!("No schema registered for sheet '{}'", sheet))?;
        let dataset = self
            .dataset(sheet)
            .ok_or_else(|| anyhow!("Workbook has no sheet '{}'", sheet))?;
        Ok((schema, dataset))
    }

    /// Validate and apply numeric field edits to one row, located by
    /// equipment and sub-assembly; any rejected value leaves the dataset
    /// untouched
    pub fn update_row(
        &mut self,
        sheet: &str,
        equipment: &str,
        subassembly: &str,
        edits: &[(String, String)],
    ) -> Result<ValidatedEdit> {
        let (schema, dataset) = self.sheet_context(sheet)?;
        let validated = edit::validate_row_edit(schema, dataset, equipment, subassembly, edits)?;

        let state = self
            .sheets
            .iter_mut()
            .find(|s| s.name == sheet)
            .expect("sheet_context verified the sheet exists");
        edit::apply_row_edit(&mut state.dataset, &validated);
        state.dirty = true;
        Ok(validated)
    }

    /// Rewrite the workbook file. Sheets edited in this session are
    /// serialized from their datasets (derived columns dropped); every other
    /// sheet passes through unchanged. On failure the in-memory state is
    /// left intact for retry.
    pub fn save(&mut self) -> Result<()> {
        let source =
            WorkbookFile::open(&self.path).context("Failed to re-read workbook for save")?;
        let edited: Vec<(String, &Dataset)> = self
            .sheets
            .iter()
            .filter(|s| s.dirty)
            .map(|s| (s.name.clone(), &s.dataset))
            .collect();

        save_workbook(&self.path, &source, &edited)?;

        for state in &mut self.sheets {
            state.dirty = false;
        }
        log::info!("Workbook saved to: {}", self.path.display());
        Ok(())
    }
}
