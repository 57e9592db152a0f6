//! Write workbooks with rust_xlsxwriter

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Range};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::workbook::dataset::Dataset;
use crate::workbook::excel::reader::WorkbookFile;
use crate::workbook::value::CellValue;

/// Rewrite a workbook: sheets listed in `edited` are serialized from their
/// in-memory datasets (derived columns dropped), every other sheet's cell
/// values are passed through unchanged from the source workbook.
pub fn save_workbook(path: &Path, source: &WorkbookFile, edited: &[(String, &Dataset)]) -> Result<()> {
    let mut workbook = Workbook::new();

    for (name, range) in source.sheets() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;
        match edited.iter().find(|(edited_name, _)| edited_name == name) {
            Some((_, dataset)) => write_dataset_sheet(worksheet, dataset)?,
            None => write_passthrough_sheet(worksheet, range)?,
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;
    Ok(())
}

/// Serialize a dataset: header row, then records, persisted columns only
fn write_dataset_sheet(worksheet: &mut Worksheet, dataset: &Dataset) -> Result<()> {
    let columns: Vec<usize> = dataset.persisted_columns().map(|(idx, _)| idx).collect();

    for (out_col, src_col) in columns.iter().enumerate() {
        worksheet.write_string(0, out_col as u16, &dataset.columns()[*src_col].label)?;
    }
    for (row_idx, row) in dataset.rows().iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        for (out_col, src_col) in columns.iter().enumerate() {
            write_cell(worksheet, out_row, out_col as u16, &row[*src_col])?;
        }
    }
    Ok(())
}

/// Copy a calamine range cell for cell, preserving original positions
fn write_passthrough_sheet(worksheet: &mut Worksheet, range: &Range<Data>) -> Result<()> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    for (r, row) in range.rows().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let out_row = start_row + r as u32;
            let out_col = (start_col as usize + c) as u16;
            match cell {
                Data::Empty | Data::Error(_) => {}
                Data::String(s) => {
                    worksheet.write_string(out_row, out_col, s)?;
                }
                Data::Float(f) => {
                    worksheet.write_number(out_row, out_col, *f)?;
                }
                Data::Int(i) => {
                    worksheet.write_number(out_row, out_col, *i as f64)?;
                }
                Data::Bool(b) => {
                    worksheet.write_boolean(out_row, out_col, *b)?;
                }
                other => {
                    worksheet.write_string(out_row, out_col, other.to_string())?;
                }
            }
        }
    }
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> Result<()> {
    match value {
        CellValue::Null => { /* Leave cell empty */ }
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
    }
    Ok(())
}

/// Export a dataset (or a filtered selection of its rows) to a standalone
/// Excel file with a bold header row. Derived columns are included: the
/// export is a view-level projection, not a workbook save.
pub fn export_dataset_excel(
    dataset: &Dataset,
    sheet_name: &str,
    rows: &[usize],
    path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    let header_format = Format::new().set_bold();
    for (col, column) in dataset.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, &column.label, &header_format)?;
    }
    for (out_row, row_idx) in rows.iter().enumerate() {
        for col in 0..dataset.columns().len() {
            write_cell(worksheet, (out_row + 1) as u32, col as u16, dataset.value(*row_idx, col))?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;
    log::info!("Sheet exported to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::schema::{ColumnSpec, SheetSchema};

    fn dataset() -> Dataset {
        let mut schema = SheetSchema::new("Cartographie moteur");
        schema.columns = vec![
            ColumnSpec::text("Equipement"),
            ColumnSpec::text("Sous-ensemble"),
            ColumnSpec::numeric("Quantité SE installée"),
        ];
        let mut dataset = Dataset::for_schema(&schema);
        dataset.push_row(vec![
            CellValue::Text("D11".into()),
            CellValue::Text("Moteur".into()),
            CellValue::Number(2.0),
        ]);
        dataset.add_derived_column("Section", vec![CellValue::Text("BG".into())]);
        dataset
    }

    #[test]
    fn test_dataset_sheet_round_trip_drops_derived_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let data = dataset();

        save_workbook_for_test(&path, &data);

        let file = WorkbookFile::open(&path).unwrap();
        let grid = file.raw_grid("Cartographie moteur");
        // Header row plus one record; no Section column persisted
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.rows[0].len(), 3);
        assert_eq!(grid.rows[0][0], CellValue::Text("Equipement".into()));
        assert_eq!(grid.rows[1][2], CellValue::Number(2.0));
    }

    #[test]
    fn test_export_includes_derived_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.xlsx");
        let data = dataset();

        export_dataset_excel(&data, "Cartographie moteur", &[0], &path).unwrap();

        let file = WorkbookFile::open(&path).unwrap();
        let grid = file.raw_grid("Cartographie moteur");
        assert_eq!(grid.rows[0].len(), 4);
        assert_eq!(grid.rows[0][3], CellValue::Text("Section".into()));
        assert_eq!(grid.rows[1][3], CellValue::Text("BG".into()));
    }

    fn save_workbook_for_test(path: &Path, dataset: &Dataset) {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Cartographie moteur").unwrap();
        write_dataset_sheet(worksheet, dataset).unwrap();
        workbook.save(path).unwrap();
    }
}
