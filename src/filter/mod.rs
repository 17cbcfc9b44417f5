//! Narrowing record sets for display.

mod temporal;

pub use temporal::{within_window, LookbackWindow};

use crate::core::OutbreakRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which disease the outbreak list is narrowed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiseaseSelection {
    #[default]
    All,
    Only(String),
}

impl DiseaseSelection {
    /// `"all"` (any case) selects everything; anything else is a disease name.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            DiseaseSelection::All
        } else {
            DiseaseSelection::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, disease: &str) -> bool {
        match self {
            DiseaseSelection::All => true,
            DiseaseSelection::Only(name) => name == disease,
        }
    }
}

impl fmt::Display for DiseaseSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiseaseSelection::All => f.write_str("All Diseases"),
            DiseaseSelection::Only(name) => f.write_str(name),
        }
    }
}

/// Outbreaks for the selected disease, in input order.
pub fn by_disease(records: &[OutbreakRecord], selection: &DiseaseSelection) -> Vec<OutbreakRecord> {
    records
        .iter()
        .filter(|record| selection.matches(&record.disease))
        .cloned()
        .collect()
}

/// Distinct disease names in first-seen order, for building a selector.
pub fn diseases(records: &[OutbreakRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for record in records {
        if !seen.iter().any(|name| name == &record.disease) {
            seen.push(record.disease.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Coordinates, Recency, Trend};

    fn outbreak(id: &str, disease: &str) -> OutbreakRecord {
        OutbreakRecord {
            id: id.into(),
            disease: disease.into(),
            location: "Somewhere".into(),
            cases: 10,
            deaths: 0,
            risk_level: None,
            last_updated: Recency::Relative("1 hour ago".into()),
            coordinates: Coordinates::default(),
            trend: Trend::Stable,
        }
    }

    #[test]
    fn test_all_selection_passes_everything() {
        let records = vec![outbreak("1", "Ebola"), outbreak("2", "COVID-19")];
        assert_eq!(by_disease(&records, &DiseaseSelection::All).len(), 2);
    }

    #[test]
    fn test_named_selection_is_exact() {
        let records = vec![
            outbreak("1", "Ebola"),
            outbreak("2", "COVID-19"),
            outbreak("3", "Ebola"),
        ];
        let selected = by_disease(&records, &DiseaseSelection::parse("Ebola"));
        let ids: Vec<_> = selected.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert!(by_disease(&records, &DiseaseSelection::parse("ebola")).is_empty());
    }

    #[test]
    fn test_parse_all_variants() {
        assert_eq!(DiseaseSelection::parse("all"), DiseaseSelection::All);
        assert_eq!(DiseaseSelection::parse("ALL"), DiseaseSelection::All);
        assert_eq!(DiseaseSelection::parse(""), DiseaseSelection::All);
        assert_eq!(DiseaseSelection::All.to_string(), "All Diseases");
    }

    #[test]
    fn test_diseases_first_seen_order() {
        let records = vec![
            outbreak("1", "Malaria"),
            outbreak("2", "Ebola"),
            outbreak("3", "Malaria"),
        ];
        assert_eq!(diseases(&records), vec!["Malaria", "Ebola"]);
    }
}
