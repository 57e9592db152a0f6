//! Cell value representation for normalized sheets

/// A single cell in a normalized dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Blank/missing cell
    #[default]
    Null,
    /// Text cell
    Text(String),
    /// Numeric cell
    Number(f64),
}

impl CellValue {
    /// Check whether this cell counts as missing (blank or whitespace-only text)
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// Total numeric coercion: numbers pass through, parseable text is parsed,
    /// anything else becomes zero
    pub fn coerce_number(&self) -> f64 {
        match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            CellValue::Null => 0.0,
        }
    }

    /// Convert to JSON value for structured output
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
            CellValue::Number(n) => serde_json::json!(*n),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => {
                // Whole numbers render without a decimal point
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_detection() {
        assert!(CellValue::Null.is_missing());
        assert!(CellValue::Text("   ".into()).is_missing());
        assert!(!CellValue::Text("BG".into()).is_missing());
        assert!(!CellValue::Number(0.0).is_missing());
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(CellValue::Number(2.5).coerce_number(), 2.5);
        assert_eq!(CellValue::Text(" 12 ".into()).coerce_number(), 12.0);
        assert_eq!(CellValue::Text("n/a".into()).coerce_number(), 0.0);
        assert_eq!(CellValue::Null.coerce_number(), 0.0);
    }

    #[test]
    fn test_display_whole_numbers() {
        assert_eq!(CellValue::Number(4.0).to_string(), "4");
        assert_eq!(CellValue::Number(4.5).to_string(), "4.5");
        assert_eq!(CellValue::Null.to_string(), "");
    }
}
