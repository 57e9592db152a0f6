//! Print a normalized sheet

use anyhow::Result;
use colored::*;

use super::select_rows;
use crate::cli::OutputFormat;
use crate::workbook::{Dataset, WorkbookSession};

pub fn handle_show(
    session: &WorkbookSession,
    sheet: &str,
    section: Option<&str>,
    filter: Option<&str>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let (schema, dataset) = session.sheet_context(sheet)?;
    if dataset.is_empty() {
        println!("{}", format!("No valid data found in sheet {}", sheet).yellow());
        return Ok(());
    }

    let mut rows = select_rows(schema, dataset, section, filter)?;
    let total = rows.len();
    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    match format {
        OutputFormat::Table => print_table(dataset, &rows),
        OutputFormat::Json => print_json(dataset, &rows)?,
    }

    if rows.len() < total {
        println!("{}", format!("({} of {} rows shown)", rows.len(), total).dimmed());
    }
    Ok(())
}

fn print_table(dataset: &Dataset, rows: &[usize]) {
    let labels: Vec<&str> = dataset.columns().iter().map(|c| c.label.as_str()).collect();

    // Column widths from the header and the selected cells
    let mut widths: Vec<usize> = labels.iter().map(|l| l.chars().count()).collect();
    for &row in rows {
        for (col, width) in widths.iter_mut().enumerate() {
            *width = (*width).max(dataset.value(row, col).to_string().chars().count());
        }
    }

    let header = labels
        .iter()
        .zip(&widths)
        .map(|(label, width)| format!("{:<width$}", label, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header.cyan().bold());
    println!("{}", "-".repeat(header.chars().count()).dimmed());

    for &row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(col, width)| {
                format!("{:<width$}", dataset.value(row, col).to_string(), width = *width)
            })
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line);
    }
}

fn print_json(dataset: &Dataset, rows: &[usize]) -> Result<()> {
    let records: Vec<serde_json::Value> = rows
        .iter()
        .map(|&row| {
            let record: serde_json::Map<String, serde_json::Value> = dataset
                .columns()
                .iter()
                .enumerate()
                .map(|(col, column)| (column.label.clone(), dataset.value(row, col).to_json()))
                .collect();
            serde_json::Value::Object(record)
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
