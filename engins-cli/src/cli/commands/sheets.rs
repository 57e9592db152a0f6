//! List workbook sheets with their recognition status

use anyhow::Result;
use colored::*;

use crate::workbook::WorkbookSession;

pub fn handle_sheets(session: &WorkbookSession) -> Result<()> {
    println!("Workbook: {}", session.path().display().to_string().cyan());
    println!();

    for state in session.sheets() {
        let status = match session.schema(&state.name) {
            Some(_) if !state.dataset.is_empty() => {
                format!("{} rows", state.dataset.len()).green().to_string()
            }
            Some(_) => "no matching header row".yellow().to_string(),
            None => "no schema".dimmed().to_string(),
        };
        println!("  {:<28} {}", state.name, status);
    }
    Ok(())
}
