//! List the distinct values of a column, the way a filter dropdown would

use anyhow::{Result, bail};

use crate::workbook::WorkbookSession;

pub fn handle_values(
    session: &WorkbookSession,
    sheet: &str,
    column: &str,
    equipment: Option<&str>,
) -> Result<()> {
    let (schema, dataset) = session.sheet_context(sheet)?;

    // Derived columns (e.g. Section) are not schema columns; fall back to the
    // dataset's own column list for those
    let canonical = schema.resolve_label(column).unwrap_or(column);
    if dataset.column_index(canonical).is_none() {
        bail!("Sheet '{}' has no column '{}'", schema.name, column);
    }

    let values = match equipment {
        Some(equipment) => {
            let Some(equipment_label) = schema.resolve_label("Equipement") else {
                bail!("Sheet '{}' has no 'Equipement' column", schema.name);
            };
            dataset.distinct_where(canonical, equipment_label, equipment)
        }
        None => dataset.distinct(canonical),
    };

    for value in values {
        println!("{}", value);
    }
    Ok(())
}
