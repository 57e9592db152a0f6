//! Row edits
//!
//! Edits are validated in full before anything is mutated: a rejected value
//! (non-numeric text, a negative quantity, an unknown column) leaves the
//! dataset exactly as it was.

use anyhow::{Result, bail};

use crate::workbook::dataset::Dataset;
use crate::workbook::schema::SheetSchema;
use crate::workbook::value::CellValue;

/// A fully validated edit, ready to apply
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEdit {
    /// Row index in the dataset
    pub row: usize,
    /// (column index, canonical label, new value) per changed field
    pub changes: Vec<(usize, String, f64)>,
}

/// Parse one user-entered value for a numeric field: empty means zero,
/// non-numeric text and negative quantities are rejected
pub fn parse_edit_value(label: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = match trimmed.parse() {
        Ok(v) => v,
        Err(_) => bail!("Invalid value for {}: '{}' is not a number", label, raw),
    };
    if value < 0.0 {
        bail!("Value for {} cannot be negative", label);
    }
    Ok(value)
}

/// Locate the row to edit by equality on the equipment and sub-assembly
/// columns (resolved through the schema's aliases); the first match wins
pub fn locate_row(
    schema: &SheetSchema,
    dataset: &Dataset,
    equipment: &str,
    subassembly: &str,
) -> Result<usize> {
    let equipment_col = key_column_index(schema, dataset, "Equipement")?;
    let subassembly_col = key_column_index(schema, dataset, "Sous-ensemble")?;

    let matches = dataset.matching_rows(&[(equipment_col, equipment), (subassembly_col, subassembly)]);
    match matches.first() {
        Some(row) => Ok(*row),
        None => bail!(
            "Equipment '{}' with sub-assembly '{}' not found in sheet '{}'",
            equipment,
            subassembly,
            schema.name
        ),
    }
}

fn key_column_index(schema: &SheetSchema, dataset: &Dataset, label: &str) -> Result<usize> {
    let Some(canonical) = schema.resolve_label(label) else {
        bail!("Sheet '{}' has no '{}' column", schema.name, label);
    };
    dataset
        .column_index(canonical)
        .ok_or_else(|| anyhow::anyhow!("Column '{}' missing from dataset", canonical))
}

/// Validate a set of (column, raw value) edits against one row
pub fn validate_row_edit(
    schema: &SheetSchema,
    dataset: &Dataset,
    equipment: &str,
    subassembly: &str,
    edits: &[(String, String)],
) -> Result<ValidatedEdit> {
    if edits.is_empty() {
        bail!("No fields to update");
    }

    let row = locate_row(schema, dataset, equipment, subassembly)?;

    let mut changes = Vec::with_capacity(edits.len());
    for (label, raw) in edits {
        let Some(canonical) = schema.resolve_label(label) else {
            bail!("Sheet '{}' has no column '{}'", schema.name, label);
        };
        if !schema.is_numeric(canonical) {
            bail!("Column '{}' is not an editable numeric column", canonical);
        }
        let col = dataset
            .column_index(canonical)
            .expect("schema column present in dataset");
        let value = parse_edit_value(canonical, raw)?;
        changes.push((col, canonical.to_string(), value));
    }

    Ok(ValidatedEdit { row, changes })
}

/// Apply a validated edit; infallible by construction
pub fn apply_row_edit(dataset: &mut Dataset, edit: &ValidatedEdit) {
    for (col, _, value) in &edit.changes {
        dataset.set_value(edit.row, *col, CellValue::Number(*value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::schema::ColumnSpec;

    fn schema() -> SheetSchema {
        let mut schema = SheetSchema::new("Cartographie moteur");
        schema.columns = vec![
            ColumnSpec::text("Equipement").alias("équipement"),
            ColumnSpec::text("Sous-ensemble").alias("Sous ensemble"),
            ColumnSpec::text("Criticité"),
            ColumnSpec::numeric("Quantité SE installée"),
            ColumnSpec::numeric("Sous-ensemble en attente révision"),
        ];
        schema
    }

    fn dataset(schema: &SheetSchema) -> Dataset {
        let mut dataset = Dataset::for_schema(schema);
        dataset.push_row(vec![
            CellValue::Text("D11".into()),
            CellValue::Text("Moteur".into()),
            CellValue::Text("A".into()),
            CellValue::Number(2.0),
            CellValue::Number(1.0),
        ]);
        dataset
    }

    #[test]
    fn test_valid_edit_applies_all_fields() {
        let schema = schema();
        let mut data = dataset(&schema);
        let edit = validate_row_edit(
            &schema,
            &data,
            "D11",
            "Moteur",
            &[
                ("Quantité SE installée".to_string(), "4".to_string()),
                ("Sous-ensemble en attente révision".to_string(), "".to_string()),
            ],
        )
        .unwrap();
        apply_row_edit(&mut data, &edit);
        assert_eq!(*data.value(0, 3), CellValue::Number(4.0));
        // Empty input means zero
        assert_eq!(*data.value(0, 4), CellValue::Number(0.0));
    }

    #[test]
    fn test_negative_value_rejected_without_mutation() {
        let schema = schema();
        let data = dataset(&schema);
        let before = data.clone();
        let result = validate_row_edit(
            &schema,
            &data,
            "D11",
            "Moteur",
            &[("Quantité SE installée".to_string(), "-1".to_string())],
        );
        assert!(result.is_err());
        assert_eq!(data, before);
    }

    #[test]
    fn test_non_numeric_text_rejected() {
        let schema = schema();
        let data = dataset(&schema);
        let result = validate_row_edit(
            &schema,
            &data,
            "D11",
            "Moteur",
            &[("Quantité SE installée".to_string(), "beaucoup".to_string())],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_text_column_not_editable() {
        let schema = schema();
        let data = dataset(&schema);
        let result = validate_row_edit(
            &schema,
            &data,
            "D11",
            "Moteur",
            &[("Criticité".to_string(), "1".to_string())],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_row_rejected() {
        let schema = schema();
        let data = dataset(&schema);
        let result = validate_row_edit(
            &schema,
            &data,
            "D99",
            "Moteur",
            &[("Quantité SE installée".to_string(), "1".to_string())],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_edit_resolves_alias_column_names() {
        let schema = schema();
        let data = dataset(&schema);
        // Row lookup and field names both go through alias resolution
        let edit = validate_row_edit(
            &schema,
            &data,
            "D11",
            "Moteur",
            &[("Quantité SE installée".to_string(), "7.5".to_string())],
        )
        .unwrap();
        assert_eq!(edit.changes[0].2, 7.5);
    }
}
