//! Update numeric fields of one row and save the workbook

use anyhow::{Result, anyhow};
use colored::*;

use crate::workbook::WorkbookSession;
use crate::workbook::edit;

pub fn handle_update(
    session: &mut WorkbookSession,
    sheet: &str,
    equipment: &str,
    subassembly: &str,
    set: &[String],
    dry_run: bool,
) -> Result<()> {
    let edits = parse_assignments(set)?;

    if dry_run {
        let (schema, dataset) = session.sheet_context(sheet)?;
        let validated = edit::validate_row_edit(schema, dataset, equipment, subassembly, &edits)?;
        println!("{}", "Dry run, workbook not modified".yellow());
        for (_, label, value) in &validated.changes {
            println!("  {} = {}", label, value);
        }
        return Ok(());
    }

    let validated = session.update_row(sheet, equipment, subassembly, &edits)?;
    session.save()?;

    println!("{}", "Data saved successfully".green().bold());
    for (_, label, value) in &validated.changes {
        println!("  {} = {}", label, value);
    }
    Ok(())
}

/// Split `COLUMN=VALUE` assignments on the first equals sign
fn parse_assignments(set: &[String]) -> Result<Vec<(String, String)>> {
    set.iter()
        .map(|assignment| {
            assignment
                .split_once('=')
                .map(|(column, value)| (column.trim().to_string(), value.trim().to_string()))
                .ok_or_else(|| anyhow!("Invalid --set '{}', expected COLUMN=VALUE", assignment))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignments() {
        let parsed = parse_assignments(&["Qte v1=4".to_string(), "Cout V2 = 1200.5".to_string()]).unwrap();
        assert_eq!(
            parsed,
            vec![
                ("Qte v1".to_string(), "4".to_string()),
                ("Cout V2".to_string(), "1200.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_assignments_rejects_missing_equals() {
        assert!(parse_assignments(&["Qte v1".to_string()]).is_err());
    }
}
