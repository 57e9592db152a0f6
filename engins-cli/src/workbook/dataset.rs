//! Normalized rectangular datasets
//!
//! A dataset holds exactly its schema's columns, in schema order, plus an
//! optional derived group column that is never written back to the workbook.

use std::collections::BTreeSet;

use crate::workbook::CellValue;
use crate::workbook::schema::SheetSchema;

/// One column of a normalized dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    /// Values in this column are fully coerced numbers
    pub numeric: bool,
    /// Derived columns exist only in memory and are dropped on save
    pub derived: bool,
}

/// An ordered, rectangular collection of normalized records
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Empty dataset with no columns (unrecognized sheets)
    pub fn empty() -> Self {
        Dataset::default()
    }

    /// Empty dataset carrying the schema's columns
    pub fn for_schema(schema: &SheetSchema) -> Self {
        Dataset {
            columns: schema
                .columns
                .iter()
                .map(|c| Column {
                    label: c.label.clone(),
                    numeric: c.numeric,
                    derived: false,
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Columns that are written back to the workbook
    pub fn persisted_columns(&self) -> impl Iterator<Item = (usize, &Column)> {
        self.columns.iter().enumerate().filter(|(_, c)| !c.derived)
    }

    /// Index of a column by exact label
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.label == label)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn value(&self, row: usize, col: usize) -> &CellValue {
        &self.rows[row][col]
    }

    /// Append a record; the caller guarantees schema-order alignment
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Append a derived column with one value per existing row
    pub fn add_derived_column(&mut self, label: impl Into<String>, values: Vec<CellValue>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(Column {
            label: label.into(),
            numeric: false,
            derived: true,
        });
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: CellValue) {
        self.rows[row][col] = value;
    }

    /// Sorted distinct non-missing display values of a column
    pub fn distinct(&self, label: &str) -> Vec<String> {
        let Some(col) = self.column_index(label) else {
            return Vec::new();
        };
        let set: BTreeSet<String> = self
            .rows
            .iter()
            .map(|row| &row[col])
            .filter(|v| !v.is_missing())
            .map(|v| v.to_string())
            .collect();
        set.into_iter().collect()
    }

    /// Sorted distinct values of `label` over rows where `where_label` displays
    /// as `equals` (e.g. sub-assemblies of one equipment)
    pub fn distinct_where(&self, label: &str, where_label: &str, equals: &str) -> Vec<String> {
        let (Some(col), Some(where_col)) = (self.column_index(label), self.column_index(where_label))
        else {
            return Vec::new();
        };
        let set: BTreeSet<String> = self
            .rows
            .iter()
            .filter(|row| row[where_col].to_string() == equals)
            .map(|row| &row[col])
            .filter(|v| !v.is_missing())
            .map(|v| v.to_string())
            .collect();
        set.into_iter().collect()
    }

    /// Row indices whose cells display-match every given (column, value) pair
    pub fn matching_rows(&self, criteria: &[(usize, &str)]) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                criteria
                    .iter()
                    .all(|(col, value)| row[*col].to_string() == *value)
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Count of non-missing cells in a column
    pub fn count_present(&self, label: &str) -> usize {
        let Some(col) = self.column_index(label) else {
            return 0;
        };
        self.rows.iter().filter(|row| !row[col].is_missing()).count()
    }

    /// Sum of a numeric column over all rows
    pub fn column_total(&self, label: &str) -> f64 {
        let Some(col) = self.column_index(label) else {
            return 0.0;
        };
        self.rows.iter().map(|row| row[col].coerce_number()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::schema::ColumnSpec;

    fn sample() -> Dataset {
        let mut schema = SheetSchema::new("test");
        schema.columns = vec![
            ColumnSpec::text("Equipement"),
            ColumnSpec::text("Sous-ensemble"),
            ColumnSpec::numeric("Quantité SE installée"),
        ];
        let mut dataset = Dataset::for_schema(&schema);
        dataset.push_row(vec![
            CellValue::Text("D11".into()),
            CellValue::Text("Moteur".into()),
            CellValue::Number(2.0),
        ]);
        dataset.push_row(vec![
            CellValue::Text("D11".into()),
            CellValue::Text("Pompe".into()),
            CellValue::Number(1.0),
        ]);
        dataset.push_row(vec![
            CellValue::Text("D8".into()),
            CellValue::Text("Moteur".into()),
            CellValue::Number(3.0),
        ]);
        dataset
    }

    #[test]
    fn test_distinct_is_sorted_and_unique() {
        let dataset = sample();
        assert_eq!(dataset.distinct("Equipement"), vec!["D11", "D8"]);
        assert_eq!(dataset.distinct("missing column"), Vec::<String>::new());
    }

    #[test]
    fn test_distinct_where_scopes_to_equipment() {
        let dataset = sample();
        assert_eq!(
            dataset.distinct_where("Sous-ensemble", "Equipement", "D11"),
            vec!["Moteur", "Pompe"]
        );
    }

    #[test]
    fn test_matching_rows_on_key_pair() {
        let dataset = sample();
        let eq = dataset.column_index("Equipement").unwrap();
        let se = dataset.column_index("Sous-ensemble").unwrap();
        assert_eq!(dataset.matching_rows(&[(eq, "D8"), (se, "Moteur")]), vec![2]);
        assert!(dataset.matching_rows(&[(eq, "D8"), (se, "Pompe")]).is_empty());
    }

    #[test]
    fn test_derived_column_not_persisted() {
        let mut dataset = sample();
        dataset.add_derived_column(
            "Section",
            vec![
                CellValue::Text("BG".into()),
                CellValue::Text("BG".into()),
                CellValue::Text("YSF".into()),
            ],
        );
        assert_eq!(dataset.columns().len(), 4);
        let persisted: Vec<&str> = dataset
            .persisted_columns()
            .map(|(_, c)| c.label.as_str())
            .collect();
        assert_eq!(persisted, vec!["Equipement", "Sous-ensemble", "Quantité SE installée"]);
    }

    #[test]
    fn test_column_total() {
        let dataset = sample();
        assert_eq!(dataset.column_total("Quantité SE installée"), 6.0);
    }
}
