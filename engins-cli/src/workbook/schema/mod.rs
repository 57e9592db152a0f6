//! Declarative sheet schemas
//!
//! One schema per workbook sheet: expected column labels (with aliases for
//! historical wording drift), numeric column flags, the categorical filter
//! column, the sentinel-row section convention and the dashboard rules.
//! The whole table is serde-deserializable so a TOML file can replace the
//! built-in registry.

mod builtin;

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// One expected column of a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Canonical column label as it appears in the workbook header
    pub label: String,
    /// Whether values are coerced to numbers
    #[serde(default)]
    pub numeric: bool,
    /// Alternate spellings seen in the wild (e.g. "équipement" for "Equipement"),
    /// resolved at registration time instead of at every call site
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl ColumnSpec {
    /// Create a text column
    pub fn text(label: impl Into<String>) -> Self {
        ColumnSpec {
            label: label.into(),
            numeric: false,
            aliases: Vec::new(),
        }
    }

    /// Create a numeric column
    pub fn numeric(label: impl Into<String>) -> Self {
        ColumnSpec {
            label: label.into(),
            numeric: true,
            aliases: Vec::new(),
        }
    }

    /// Add an alias spelling
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Exact match against a cleaned header label (canonical or alias)
    pub fn matches(&self, cleaned: &str) -> bool {
        self.label == cleaned || self.aliases.iter().any(|a| a == cleaned)
    }

    /// Substring containment test used for header-row detection
    pub fn contained_in(&self, cleaned_cell: &str) -> bool {
        cleaned_cell.contains(&self.label) || self.aliases.iter().any(|a| cleaned_cell.contains(a.as_str()))
    }
}

fn default_section_label() -> String {
    "Section".to_string()
}

/// Sentinel-row grouping convention: rows whose key cell equals one of the
/// sentinels start a new group and are removed from the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRule {
    /// Label of the derived (never persisted) group column
    #[serde(default = "default_section_label")]
    pub column_label: String,
    /// Key-column values that mark the start of a group
    pub sentinels: Vec<String>,
}

/// Dashboard alert rule: a row alerts when `available` is zero while
/// `pending` is positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhaustionAlert {
    pub available: String,
    pub pending: String,
}

/// Declarative description of one sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSchema {
    /// Sheet name as it appears in the workbook
    pub name: String,
    /// Expected columns, in output order; the first column is the row key
    pub columns: Vec<ColumnSpec>,
    /// Categorical column used to populate the filter dropdown
    #[serde(default)]
    pub filter_column: Option<String>,
    /// Sentinel-row section convention, if the sheet uses one
    #[serde(default)]
    pub section: Option<SectionRule>,
    /// Numeric columns totalled on the dashboard
    #[serde(default)]
    pub summary_columns: Vec<String>,
    /// Dashboard alert rule, if the sheet has one
    #[serde(default)]
    pub exhaustion_alert: Option<ExhaustionAlert>,
}

impl SheetSchema {
    /// Create a schema with no columns yet
    pub fn new(name: impl Into<String>) -> Self {
        SheetSchema {
            name: name.into(),
            columns: Vec::new(),
            filter_column: None,
            section: None,
            summary_columns: Vec::new(),
            exhaustion_alert: None,
        }
    }

    /// The key column (first declared column); rows with a missing key are dropped
    pub fn key_column(&self) -> &ColumnSpec {
        &self.columns[0]
    }

    /// Resolve a label or alias to the canonical column label
    pub fn resolve_label(&self, label: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.matches(label))
            .map(|c| c.label.as_str())
    }

    /// Find a column spec by canonical label or alias
    pub fn column(&self, label: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.matches(label))
    }

    /// Whether the given label (or alias) names a numeric column
    pub fn is_numeric(&self, label: &str) -> bool {
        self.column(label).is_some_and(|c| c.numeric)
    }
}

/// Registry of sheet schemas, keyed by sheet name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    #[serde(rename = "sheet")]
    schemas: Vec<SheetSchema>,
}

impl SchemaRegistry {
    /// The built-in registry for the ENGINS maintenance workbook
    pub fn builtin() -> Self {
        builtin::registry()
    }

    /// Build a registry from explicit schemas
    pub fn from_schemas(schemas: Vec<SheetSchema>) -> Result<Self> {
        let registry = SchemaRegistry { schemas };
        registry.validate()?;
        Ok(registry)
    }

    /// Parse a registry from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let registry: SchemaRegistry =
            toml::from_str(text).context("Failed to parse schema TOML")?;
        registry.validate()?;
        Ok(registry)
    }

    /// Load a registry from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Look up the schema for a sheet name
    pub fn get(&self, sheet_name: &str) -> Option<&SheetSchema> {
        self.schemas.iter().find(|s| s.name == sheet_name)
    }

    /// All registered schemas
    pub fn schemas(&self) -> &[SheetSchema] {
        &self.schemas
    }

    /// Check internal consistency: every schema has columns, and every label
    /// referenced by a filter/section/summary/alert rule resolves
    fn validate(&self) -> Result<()> {
        for schema in &self.schemas {
            if schema.columns.is_empty() {
                bail!("Schema '{}' declares no columns", schema.name);
            }
            if let Some(ref filter) = schema.filter_column
                && schema.resolve_label(filter).is_none()
            {
                bail!(
                    "Schema '{}': filter column '{}' is not a declared column",
                    schema.name,
                    filter
                );
            }
            for label in &schema.summary_columns {
                if !schema.is_numeric(label) {
                    bail!(
                        "Schema '{}': summary column '{}' is not a declared numeric column",
                        schema.name,
                        label
                    );
                }
            }
            if let Some(ref alert) = schema.exhaustion_alert {
                for label in [&alert.available, &alert.pending] {
                    if !schema.is_numeric(label) {
                        bail!(
                            "Schema '{}': alert column '{}' is not a declared numeric column",
                            schema.name,
                            label
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
