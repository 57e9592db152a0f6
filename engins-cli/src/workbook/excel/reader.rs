//! Read workbook sheets with calamine

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx, open_workbook};

use crate::workbook::normalize::{HeadedTable, RawGrid};
use crate::workbook::value::CellValue;

/// A workbook read into memory: every sheet's typed cell range, in workbook
/// order. The ranges double as the re-read source for normalization and as
/// the passthrough source on save.
pub struct WorkbookFile {
    sheets: Vec<(String, Range<Data>)>,
}

impl WorkbookFile {
    /// Open an `.xlsx` workbook and read every sheet
    pub fn open(path: &Path) -> Result<Self> {
        let mut workbook: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .with_context(|| format!("Failed to read sheet: {}", name))?;
            sheets.push((name, range));
        }
        Ok(WorkbookFile { sheets })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    /// All sheets with their cell ranges
    pub fn sheets(&self) -> &[(String, Range<Data>)] {
        &self.sheets
    }

    fn range(&self, name: &str) -> Option<&Range<Data>> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(_, range)| range)
    }

    /// Header-less view of a sheet, as read
    pub fn raw_grid(&self, name: &str) -> RawGrid {
        let Some(range) = self.range(name) else {
            return RawGrid::default();
        };
        RawGrid {
            rows: range
                .rows()
                .map(|row| row.iter().map(cell_value).collect())
                .collect(),
        }
    }

    /// Re-read a sheet treating row `skip_rows` as the header row. calamine
    /// ranges are already typed, so this re-slices the captured range rather
    /// than touching the file again.
    pub fn headed_table(&self, name: &str, skip_rows: usize) -> HeadedTable {
        let Some(range) = self.range(name) else {
            return HeadedTable::default();
        };
        let rows: Vec<&[Data]> = range.rows().collect();
        if skip_rows >= rows.len() {
            return HeadedTable::default();
        }
        let columns = rows[skip_rows]
            .iter()
            .map(|d| cell_value(d).to_string())
            .collect();
        let data_rows = rows[skip_rows + 1..]
            .iter()
            .map(|row| row.iter().map(cell_value).collect())
            .collect();
        HeadedTable {
            columns,
            rows: data_rows,
        }
    }
}

/// Map a calamine cell onto the normalized value model
pub fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::Error(_) => CellValue::Null,
        // Date/duration cells surface through their display form
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_mapping() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Null);
        assert_eq!(cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(cell_value(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(
            cell_value(&Data::String("D11".to_string())),
            CellValue::Text("D11".to_string())
        );
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Text("true".to_string()));
    }
}
