//! Statistics and stock alerts

use std::path::Path;

use anyhow::Result;
use colored::*;

use crate::workbook::WorkbookSession;
use crate::workbook::stats::{SheetSummary, build_summary, export_summary_excel};

pub fn handle_dashboard(
    session: &WorkbookSession,
    sheet: Option<&str>,
    report: Option<&Path>,
) -> Result<()> {
    let summaries = collect_summaries(session, sheet)?;

    for summary in &summaries {
        print_summary(summary);
    }

    if let Some(path) = report {
        export_summary_excel(&summaries, path)?;
        println!("Report written to {}", path.display().to_string().cyan());
    }
    Ok(())
}

fn collect_summaries(session: &WorkbookSession, sheet: Option<&str>) -> Result<Vec<SheetSummary>> {
    match sheet {
        Some(name) => {
            let (schema, dataset) = session.sheet_context(name)?;
            Ok(vec![build_summary(schema, dataset)])
        }
        None => Ok(session
            .sheets()
            .iter()
            .filter(|state| !state.dataset.is_empty())
            .filter_map(|state| {
                session
                    .schema(&state.name)
                    .map(|schema| build_summary(schema, &state.dataset))
            })
            .collect()),
    }
}

fn print_summary(summary: &SheetSummary) {
    println!("{}", summary.sheet.bold());
    println!("  Total Equipments: {}", summary.equipment_count);
    if let Some(count) = summary.subassembly_count {
        println!("  Total Sous-ensembles: {}", count);
    }
    for (label, total) in &summary.column_totals {
        println!("  {}: {:.2}", label, total);
    }

    match &summary.alerts {
        None => println!("  {}", "Alerts not applicable for this sheet.".dimmed()),
        Some(alerts) if alerts.is_empty() => println!("  {}", "No critical alerts.".green()),
        Some(alerts) => {
            for alert in alerts {
                println!(
                    "  {}",
                    format!(
                        "Critical: {} - {} has 0 available and {} awaiting revision.",
                        alert.equipment, alert.subassembly, alert.pending
                    )
                    .red()
                );
            }
        }
    }
    println!();
}
