//! Command handlers

pub mod dashboard;
pub mod export;
pub mod sheets;
pub mod show;
pub mod update;
pub mod values;

use anyhow::{Result, bail};

use crate::workbook::Dataset;
use crate::workbook::schema::SheetSchema;

/// Resolve the --section/--filter options to a row selection. No options
/// means every row; unknown filter dimensions are user errors.
pub(crate) fn select_rows(
    schema: &SheetSchema,
    dataset: &Dataset,
    section: Option<&str>,
    filter: Option<&str>,
) -> Result<Vec<usize>> {
    let mut criteria: Vec<(usize, &str)> = Vec::new();

    if let Some(value) = section {
        let Some(rule) = &schema.section else {
            bail!("Sheet '{}' has no section grouping", schema.name);
        };
        let Some(col) = dataset.column_index(&rule.column_label) else {
            bail!("Sheet '{}' has no '{}' column", schema.name, rule.column_label);
        };
        criteria.push((col, value));
    }

    if let Some(value) = filter {
        let Some(label) = schema.filter_column.as_deref() else {
            bail!("Sheet '{}' has no filter column", schema.name);
        };
        let canonical = schema.resolve_label(label).unwrap_or(label);
        let Some(col) = dataset.column_index(canonical) else {
            bail!("Sheet '{}' has no '{}' column", schema.name, canonical);
        };
        criteria.push((col, value));
    }

    if criteria.is_empty() {
        Ok((0..dataset.len()).collect())
    } else {
        Ok(dataset.matching_rows(&criteria))
    }
}
