//! Sheet normalization
//!
//! Turns a loosely-structured workbook sheet into a clean rectangular
//! dataset: locate the real header row among leading metadata rows, re-read
//! the sheet with that row as column headers, reconcile the actual columns
//! against the declared schema, coerce numeric columns and derive the
//! section grouping from sentinel rows.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::workbook::dataset::Dataset;
use crate::workbook::schema::SheetSchema;
use crate::workbook::value::CellValue;

/// Header detection scans at most this many leading rows
pub const HEADER_SCAN_ROWS: usize = 10;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A sheet read with no header interpretation
#[derive(Debug, Clone, Default)]
pub struct RawGrid {
    pub rows: Vec<Vec<CellValue>>,
}

/// A sheet re-read with a designated header row
#[derive(Debug, Clone, Default)]
pub struct HeadedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

/// Trim and collapse internal whitespace/newlines to single spaces, so that
/// labels with line breaks embedded in header cells still compare cleanly
pub fn clean_label(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

/// Locate the header row: the first of the leading rows in which every
/// expected column label (or alias) appears as a substring of some cell
pub fn find_header_row(grid: &RawGrid, schema: &SheetSchema) -> Option<usize> {
    for (idx, row) in grid.rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let cells: Vec<String> = row.iter().map(|v| clean_label(&v.to_string())).collect();
        let qualifies = schema
            .columns
            .iter()
            .all(|col| cells.iter().any(|cell| col.contained_in(cell)));
        if qualifies {
            return Some(idx);
        }
    }
    None
}

/// Normalize one sheet.
///
/// `reread` is a capability supplied by the caller to re-read the same sheet
/// treating the given row index as the header row; the normalizer itself
/// performs no I/O. An unrecognized layout (no qualifying header row within
/// the scan window) yields an empty dataset with the schema's columns and a
/// logged diagnostic; it is an expected outcome, not an error.
pub fn normalize_sheet<F>(grid: &RawGrid, schema: &SheetSchema, reread: F) -> Result<Dataset>
where
    F: FnOnce(usize) -> Result<HeadedTable>,
{
    let mut dataset = Dataset::for_schema(schema);

    if grid.rows.is_empty() {
        log::info!("Sheet '{}' is empty, skipping", schema.name);
        return Ok(dataset);
    }

    let Some(header_row) = find_header_row(grid, schema) else {
        log::warn!(
            "Sheet '{}': no header row matching the expected columns in the first {} rows",
            schema.name,
            HEADER_SCAN_ROWS
        );
        return Ok(dataset);
    };
    log::debug!("Sheet '{}': header located at row {}", schema.name, header_row);

    let table = reread(header_row)?;
    let source_map = map_columns(&table, schema);

    // Project to schema order, dropping rows with a missing key
    for source_row in &table.rows {
        let key = cell_at(source_row, source_map[0]);
        if key.is_missing() {
            continue;
        }
        let record: Vec<CellValue> = source_map
            .iter()
            .zip(&schema.columns)
            .map(|(source_col, spec)| {
                let cell = cell_at(source_row, *source_col);
                if spec.numeric {
                    CellValue::Number(cell.coerce_number())
                } else {
                    cell.clone()
                }
            })
            .collect();
        dataset.push_row(record);
    }

    if let Some(rule) = &schema.section {
        derive_sections(&mut dataset, schema, rule);
    }

    Ok(dataset)
}

/// For each schema column, the index of the source column it reads from.
///
/// Each source column is claimed at most once, so repeated expected labels
/// (the performance sheets declare `OT` six times) consume distinct source
/// columns left to right. Expected labels with no match read as all-missing.
fn map_columns(table: &HeadedTable, schema: &SheetSchema) -> Vec<Option<usize>> {
    let cleaned: Vec<String> = table.columns.iter().map(|c| clean_label(c)).collect();
    let mut claimed = vec![false; cleaned.len()];

    schema
        .columns
        .iter()
        .map(|spec| {
            let found = cleaned
                .iter()
                .enumerate()
                .find(|(idx, label)| !claimed[*idx] && spec.matches(label.as_str()));
            match found {
                Some((idx, _)) => {
                    claimed[idx] = true;
                    Some(idx)
                }
                None => {
                    log::debug!(
                        "Sheet '{}': expected column '{}' absent, filling with missing values",
                        schema.name,
                        spec.label
                    );
                    None
                }
            }
        })
        .collect()
}

fn cell_at(row: &[CellValue], col: Option<usize>) -> &CellValue {
    static NULL: CellValue = CellValue::Null;
    col.and_then(|c| row.get(c)).unwrap_or(&NULL)
}

/// Forward scan assigning each row the most recent sentinel seen in the key
/// column; sentinel rows themselves are removed from the dataset
fn derive_sections(dataset: &mut Dataset, schema: &SheetSchema, rule: &crate::workbook::schema::SectionRule) {
    let key_col = 0;
    let mut current: Option<String> = None;
    let mut kept_rows = Vec::with_capacity(dataset.len());
    let mut sections = Vec::with_capacity(dataset.len());

    for row in dataset.rows() {
        let key = row[key_col].to_string();
        let key = key.trim();
        if rule.sentinels.iter().any(|s| s == key) {
            current = Some(key.to_string());
            continue;
        }
        kept_rows.push(row.clone());
        sections.push(match &current {
            Some(section) => CellValue::Text(section.clone()),
            None => CellValue::Null,
        });
    }

    let mut rebuilt = Dataset::for_schema(schema);
    for row in kept_rows {
        rebuilt.push_row(row);
    }
    rebuilt.add_derived_column(rule.column_label.clone(), sections);
    *dataset = rebuilt;
}
