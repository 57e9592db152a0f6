//! Built-in schemas for the ENGINS maintenance workbook

use super::{ColumnSpec, ExhaustionAlert, SchemaRegistry, SectionRule, SheetSchema};

/// Equipment identifiers that double as section markers in the cartography sheets
const SECTION_SENTINELS: [&str; 2] = ["BG", "YSF"];

pub(super) fn registry() -> SchemaRegistry {
    let schemas = vec![
        park_engin(),
        cartography("Cartographie moteur"),
        cartography("Cartographie transmission"),
        cartography("Cartographie Engin"),
        performances("Performances BG"),
        performances("Performances YSF"),
        programme_bg(),
        programme_ysf(),
    ];
    // Built-in schemas are internally consistent by construction
    SchemaRegistry::from_schemas(schemas).expect("built-in schema registry is valid")
}

fn park_engin() -> SheetSchema {
    let mut schema = SheetSchema::new("Park engin");
    schema.columns = vec![
        ColumnSpec::text("Equipement").alias("équipement"),
        ColumnSpec::text("MLE"),
        ColumnSpec::text("DMS"),
        ColumnSpec::text("TYPE"),
        ColumnSpec::text("N° DES SERIES"),
        ColumnSpec::text("SITUATION"),
    ];
    schema.filter_column = Some("SITUATION".to_string());
    schema
}

/// The three cartography sheets share one layout: mixed equipment/sentinel
/// rows in the key column, five numeric stock counters
fn cartography(name: &str) -> SheetSchema {
    let mut schema = SheetSchema::new(name);
    schema.columns = vec![
        ColumnSpec::text("Equipement").alias("équipement"),
        ColumnSpec::text("Sous-ensemble").alias("Sous ensemble"),
        ColumnSpec::text("Criticité"),
        ColumnSpec::numeric("Quantité SE installée"),
        ColumnSpec::numeric("Sous-ensemble relais disponible (révisé)"),
        ColumnSpec::numeric("Sous-ensemble en attente révision"),
        ColumnSpec::numeric("Sous-ensemble encours de révision"),
        ColumnSpec::numeric("Corps de Sous-ensembles disponibles (révisable)"),
    ];
    schema.filter_column = Some("Criticité".to_string());
    schema.section = Some(SectionRule {
        column_label: "Section".to_string(),
        sentinels: SECTION_SENTINELS.iter().map(|s| s.to_string()).collect(),
    });
    schema.summary_columns = vec![
        "Sous-ensemble en attente révision".to_string(),
        "Sous-ensemble encours de révision".to_string(),
    ];
    schema.exhaustion_alert = Some(ExhaustionAlert {
        available: "Sous-ensemble relais disponible (révisé)".to_string(),
        pending: "Sous-ensemble en attente révision".to_string(),
    });
    schema
}

/// Performance history sheets: six change-date/work-order/counter triples
/// followed by the current counter and the computed performance figure.
/// The work-order column label repeats; reconciliation claims one source
/// column per occurrence.
fn performances(name: &str) -> SheetSchema {
    let mut schema = SheetSchema::new(name);
    schema.columns.push(ColumnSpec::text("équipement").alias("Equipement"));
    schema.columns.push(ColumnSpec::text("Sous-ensemble").alias("Sous ensemble"));
    for i in 1..=6 {
        schema.columns.push(ColumnSpec::text(format!("date de changement {}", i)));
        schema.columns.push(ColumnSpec::text("OT"));
        schema.columns.push(ColumnSpec::numeric(format!("Compteur de changement {}", i)));
    }
    schema.columns.push(ColumnSpec::numeric("compteur actuel S45/2024"));
    schema.columns.push(ColumnSpec::numeric("PERFORMANCE"));
    schema
}

fn programme_bg() -> SheetSchema {
    let mut schema = SheetSchema::new("Programme 2025 BG");
    schema.columns = vec![
        ColumnSpec::text("Type d'engin"),
        ColumnSpec::text("Equipement").alias("équipement"),
        ColumnSpec::text("Sous-ensemble").alias("Sous ensemble"),
        ColumnSpec::numeric("Qte v1"),
        ColumnSpec::numeric("Qte v2"),
        ColumnSpec::numeric("Qte v3"),
        ColumnSpec::numeric("Devis unitaire"),
        ColumnSpec::numeric("Cout V2"),
        ColumnSpec::numeric("Cout V3"),
        ColumnSpec::text("Commentaire"),
        ColumnSpec::text("SECTION AFFECTATION"),
    ];
    schema.filter_column = Some("SECTION AFFECTATION".to_string());
    schema.summary_columns = vec!["Cout V2".to_string()];
    schema
}

fn programme_ysf() -> SheetSchema {
    let mut schema = SheetSchema::new("Programme 2025 YSF");
    schema.columns = vec![
        ColumnSpec::text("Equipement").alias("équipement"),
        ColumnSpec::text("Engin"),
        ColumnSpec::text("REP"),
        ColumnSpec::text("Sous ensemble").alias("Sous-ensemble"),
        ColumnSpec::numeric("Seuil HM"),
        ColumnSpec::numeric("HM cumulés"),
        ColumnSpec::numeric("Devis unitaire"),
        ColumnSpec::numeric("Qte [V1]"),
        ColumnSpec::numeric("Cout V1"),
        ColumnSpec::numeric("Qte [V2]"),
        ColumnSpec::numeric("Cout [V2]"),
        ColumnSpec::text("OBS"),
        ColumnSpec::text("SECTION AFFECTATION"),
    ];
    schema.filter_column = Some("SECTION AFFECTATION".to_string());
    schema.summary_columns = vec!["Cout V1".to_string(), "Cout [V2]".to_string()];
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_covers_all_sheets() {
        let registry = SchemaRegistry::builtin();
        for name in [
            "Park engin",
            "Cartographie moteur",
            "Cartographie transmission",
            "Cartographie Engin",
            "Performances BG",
            "Performances YSF",
            "Programme 2025 BG",
            "Programme 2025 YSF",
        ] {
            assert!(registry.get(name).is_some(), "missing schema for {}", name);
        }
        assert_eq!(registry.schemas().len(), 8);
    }

    #[test]
    fn test_cartography_declares_section_convention() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.get("Cartographie moteur").unwrap();
        let section = schema.section.as_ref().unwrap();
        assert_eq!(section.sentinels, vec!["BG", "YSF"]);
        assert!(schema.is_numeric("Quantité SE installée"));
        assert!(!schema.is_numeric("Criticité"));
    }

    #[test]
    fn test_performance_sheet_repeats_work_order_column() {
        let registry = SchemaRegistry::builtin();
        let schema = registry.get("Performances BG").unwrap();
        assert_eq!(schema.columns.len(), 22);
        let ot_count = schema.columns.iter().filter(|c| c.label == "OT").count();
        assert_eq!(ot_count, 6);
        assert_eq!(schema.key_column().label, "équipement");
        assert_eq!(schema.resolve_label("Equipement"), Some("équipement"));
    }

    #[test]
    fn test_programme_key_column_is_first_declared() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(
            registry.get("Programme 2025 BG").unwrap().key_column().label,
            "Type d'engin"
        );
        assert_eq!(
            registry.get("Programme 2025 YSF").unwrap().key_column().label,
            "Equipement"
        );
    }
}
