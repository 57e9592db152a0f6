//! Export a normalized sheet to CSV or Excel

use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::*;
use csv::Writer;

use super::select_rows;
use crate::workbook::excel::export_dataset_excel;
use crate::workbook::{Dataset, WorkbookSession};

pub fn handle_export(
    session: &WorkbookSession,
    sheet: &str,
    output: &Path,
    section: Option<&str>,
    filter: Option<&str>,
) -> Result<()> {
    let (schema, dataset) = session.sheet_context(sheet)?;
    let rows = select_rows(schema, dataset, section, filter)?;

    match output.extension().and_then(|e| e.to_str()) {
        Some("csv") => export_csv(dataset, &rows, output)?,
        Some("xlsx") => export_dataset_excel(dataset, &schema.name, &rows, output)?,
        _ => bail!(
            "Unsupported export format: {} (expected .csv or .xlsx)",
            output.display()
        ),
    }

    println!(
        "Exported {} rows to {}",
        rows.len(),
        output.display().to_string().cyan()
    );
    Ok(())
}

fn export_csv(dataset: &Dataset, rows: &[usize], path: &Path) -> Result<()> {
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record(dataset.columns().iter().map(|c| c.label.as_str()))
        .context("Failed to write CSV header")?;

    for &row in rows {
        wtr.write_record(dataset.rows()[row].iter().map(|v| v.to_string()))
            .with_context(|| format!("Failed to write row {}", row))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    log::info!("CSV file exported to: {}", path.display());
    Ok(())
}
