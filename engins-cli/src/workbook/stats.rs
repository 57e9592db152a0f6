//! Dashboard statistics and stock alerts
//!
//! Per-sheet figures for the dashboard: distinct equipment count,
//! sub-assembly count, totals of the schema's summary columns, and rows
//! whose revised stock is exhausted while units await revision.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::workbook::dataset::Dataset;
use crate::workbook::schema::{ExhaustionAlert, SheetSchema};

/// Summary figures for one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    pub sheet: String,
    pub equipment_count: usize,
    /// None when the sheet has no sub-assembly column
    pub subassembly_count: Option<usize>,
    /// Totals of the schema's summary columns, in declared order
    pub column_totals: Vec<(String, f64)>,
    /// None when the sheet declares no alert rule
    pub alerts: Option<Vec<StockAlert>>,
}

/// A row whose revised stock is exhausted while units await revision
#[derive(Debug, Clone, PartialEq)]
pub struct StockAlert {
    pub equipment: String,
    pub subassembly: String,
    pub pending: f64,
}

/// Compute the dashboard summary for one normalized sheet
pub fn build_summary(schema: &SheetSchema, dataset: &Dataset) -> SheetSummary {
    let equipment_label = schema
        .resolve_label("Equipement")
        .unwrap_or(schema.key_column().label.as_str());
    let equipment_count = dataset.distinct(equipment_label).len();

    let subassembly_count = schema
        .resolve_label("Sous-ensemble")
        .map(|label| dataset.count_present(label));

    let column_totals = schema
        .summary_columns
        .iter()
        .map(|label| (label.clone(), dataset.column_total(label)))
        .collect();

    let alerts = schema
        .exhaustion_alert
        .as_ref()
        .map(|rule| collect_alerts(schema, dataset, rule));

    SheetSummary {
        sheet: schema.name.clone(),
        equipment_count,
        subassembly_count,
        column_totals,
        alerts,
    }
}

fn collect_alerts(schema: &SheetSchema, dataset: &Dataset, rule: &ExhaustionAlert) -> Vec<StockAlert> {
    let (Some(available), Some(pending)) = (
        dataset.column_index(&rule.available),
        dataset.column_index(&rule.pending),
    ) else {
        return Vec::new();
    };
    let equipment_col = schema
        .resolve_label("Equipement")
        .and_then(|label| dataset.column_index(label));
    let subassembly_col = schema
        .resolve_label("Sous-ensemble")
        .and_then(|label| dataset.column_index(label));

    dataset
        .rows()
        .iter()
        .filter(|row| row[available].coerce_number() == 0.0 && row[pending].coerce_number() > 0.0)
        .map(|row| StockAlert {
            equipment: equipment_col.map(|c| row[c].to_string()).unwrap_or_default(),
            subassembly: subassembly_col.map(|c| row[c].to_string()).unwrap_or_default(),
            pending: row[pending].coerce_number(),
        })
        .collect()
}

/// Export dashboard summaries to a formatted Excel report: a summary sheet,
/// a per-column totals sheet and an alerts sheet
pub fn export_summary_excel(summaries: &[SheetSummary], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    create_summary_sheet(&mut workbook, summaries)?;
    create_totals_sheet(&mut workbook, summaries)?;
    create_alerts_sheet(&mut workbook, summaries)?;

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;
    log::info!("Dashboard report exported to: {}", path.display());
    Ok(())
}

fn header_format() -> Format {
    Format::new().set_bold()
}

fn create_summary_sheet(workbook: &mut Workbook, summaries: &[SheetSummary]) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;

    let bold = header_format();
    sheet.write_string_with_format(0, 0, "Dashboard report", &bold)?;
    sheet.write_string(
        0,
        1,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    )?;

    write_header_row(sheet, 2, &["Sheet", "Equipments", "Sub-assemblies", "Alerts"])?;
    for (i, summary) in summaries.iter().enumerate() {
        let row = 3 + i as u32;
        sheet.write_string(row, 0, &summary.sheet)?;
        sheet.write_number(row, 1, summary.equipment_count as f64)?;
        if let Some(count) = summary.subassembly_count {
            sheet.write_number(row, 2, count as f64)?;
        }
        let alert_count = summary.alerts.as_ref().map_or(0, |alerts| alerts.len());
        sheet.write_number(row, 3, alert_count as f64)?;
    }
    Ok(())
}

fn create_totals_sheet(workbook: &mut Workbook, summaries: &[SheetSummary]) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Totals")?;

    write_header_row(sheet, 0, &["Sheet", "Column", "Total"])?;
    let mut row = 1;
    for summary in summaries {
        for (label, total) in &summary.column_totals {
            sheet.write_string(row, 0, &summary.sheet)?;
            sheet.write_string(row, 1, label)?;
            sheet.write_number(row, 2, *total)?;
            row += 1;
        }
    }
    Ok(())
}

fn create_alerts_sheet(workbook: &mut Workbook, summaries: &[SheetSummary]) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name("Alerts")?;

    write_header_row(sheet, 0, &["Sheet", "Equipement", "Sous-ensemble", "Awaiting revision"])?;
    let mut row = 1;
    for summary in summaries {
        for alert in summary.alerts.iter().flatten() {
            sheet.write_string(row, 0, &summary.sheet)?;
            sheet.write_string(row, 1, &alert.equipment)?;
            sheet.write_string(row, 2, &alert.subassembly)?;
            sheet.write_number(row, 3, alert.pending)?;
            row += 1;
        }
    }
    Ok(())
}

fn write_header_row(sheet: &mut Worksheet, row: u32, headers: &[&str]) -> Result<()> {
    let bold = header_format();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *header, &bold)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::CellValue;
    use crate::workbook::schema::SchemaRegistry;

    fn cartography_dataset(schema: &SheetSchema) -> Dataset {
        let mut dataset = Dataset::for_schema(schema);
        // D11/Moteur: exhausted stock with one unit awaiting revision
        dataset.push_row(vec![
            CellValue::Text("D11".into()),
            CellValue::Text("Moteur".into()),
            CellValue::Text("A".into()),
            CellValue::Number(2.0),
            CellValue::Number(0.0),
            CellValue::Number(1.0),
            CellValue::Number(1.0),
            CellValue::Number(0.0),
        ]);
        dataset.push_row(vec![
            CellValue::Text("D11".into()),
            CellValue::Text("Pompe".into()),
            CellValue::Text("B".into()),
            CellValue::Number(1.0),
            CellValue::Number(2.0),
            CellValue::Number(3.0),
            CellValue::Number(0.0),
            CellValue::Number(1.0),
        ]);
        dataset
    }

    #[test]
    fn test_summary_counts_and_totals() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.get("Cartographie moteur").unwrap();
        let dataset = cartography_dataset(schema);

        let summary = build_summary(schema, &dataset);
        assert_eq!(summary.equipment_count, 1);
        assert_eq!(summary.subassembly_count, Some(2));
        assert_eq!(
            summary.column_totals,
            vec![
                ("Sous-ensemble en attente révision".to_string(), 4.0),
                ("Sous-ensemble encours de révision".to_string(), 1.0),
            ]
        );
    }

    #[test]
    fn test_exhaustion_alert_fires_on_zero_stock_with_pending_units() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.get("Cartographie moteur").unwrap();
        let dataset = cartography_dataset(schema);

        let summary = build_summary(schema, &dataset);
        let alerts = summary.alerts.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].equipment, "D11");
        assert_eq!(alerts[0].subassembly, "Moteur");
        assert_eq!(alerts[0].pending, 1.0);
    }

    #[test]
    fn test_sheet_without_alert_rule_has_no_alerts() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.get("Park engin").unwrap();
        let dataset = Dataset::for_schema(schema);

        let summary = build_summary(schema, &dataset);
        assert!(summary.alerts.is_none());
        assert_eq!(summary.subassembly_count, None);
        assert!(summary.column_totals.is_empty());
    }
}
