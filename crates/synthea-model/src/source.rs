//! Catalogue of the Synthea source tables the pipeline ingests.
//!
//! Every run requires all six tables. Each table declares two disjoint sets of
//! typed columns (by normalized name); every other column is treated as text.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// One of the fixed Synthea CSV extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceTable {
    Encounters,
    Conditions,
    Procedures,
    Medications,
    Patients,
    Providers,
}

impl SourceTable {
    /// All source tables in load order.
    pub const ALL: [SourceTable; 6] = [
        SourceTable::Encounters,
        SourceTable::Conditions,
        SourceTable::Procedures,
        SourceTable::Medications,
        SourceTable::Patients,
        SourceTable::Providers,
    ];

    /// Table name used in logs and output artifact names.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTable::Encounters => "encounters",
            SourceTable::Conditions => "conditions",
            SourceTable::Procedures => "procedures",
            SourceTable::Medications => "medications",
            SourceTable::Patients => "patients",
            SourceTable::Providers => "providers",
        }
    }

    /// File expected directly under the input directory (case-sensitive).
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceTable::Encounters => "encounters.csv",
            SourceTable::Conditions => "conditions.csv",
            SourceTable::Procedures => "procedures.csv",
            SourceTable::Medications => "medications.csv",
            SourceTable::Patients => "patients.csv",
            SourceTable::Providers => "providers.csv",
        }
    }

    /// Columns parsed to UTC instants.
    pub fn datetime_columns(&self) -> &'static [&'static str] {
        match self {
            SourceTable::Encounters => &["start", "stop"],
            SourceTable::Conditions => &["start", "stop"],
            SourceTable::Procedures => &["date"],
            SourceTable::Medications => &["start", "stop"],
            SourceTable::Patients => &["birthdate", "deathdate"],
            SourceTable::Providers => &[],
        }
    }

    /// Columns parsed to floating point.
    pub fn numeric_columns(&self) -> &'static [&'static str] {
        match self {
            SourceTable::Encounters => &["base_encounter_cost", "total_claim_cost", "payer_coverage"],
            SourceTable::Conditions => &[],
            SourceTable::Procedures => &["base_cost"],
            SourceTable::Medications => &["base_cost", "payer_coverage", "dispenses", "totalcost"],
            SourceTable::Patients => &["lat", "lon", "healthcare_expenses", "healthcare_coverage"],
            SourceTable::Providers => &["lat", "lon", "utilization"],
        }
    }

    pub fn is_datetime_column(&self, column: &str) -> bool {
        self.datetime_columns().contains(&column)
    }

    pub fn is_numeric_column(&self, column: &str) -> bool {
        self.numeric_columns().contains(&column)
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceTable {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        SourceTable::ALL
            .into_iter()
            .find(|table| table.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownTable(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_column_sets_are_disjoint() {
        for table in SourceTable::ALL {
            for column in table.datetime_columns() {
                assert!(
                    !table.is_numeric_column(column),
                    "{table}.{column} declared as both datetime and numeric"
                );
            }
        }
    }

    #[test]
    fn file_names_follow_table_names() {
        for table in SourceTable::ALL {
            assert_eq!(table.file_name(), format!("{}.csv", table.as_str()));
        }
    }

    #[test]
    fn parses_table_names_case_insensitively() {
        assert_eq!("Encounters".parse::<SourceTable>().unwrap(), SourceTable::Encounters);
        assert_eq!(" providers ".parse::<SourceTable>().unwrap(), SourceTable::Providers);
        assert!("observations".parse::<SourceTable>().is_err());
    }
}
