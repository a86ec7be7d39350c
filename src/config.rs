//! Reconciliation configuration

use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::validation::{validate_column_mapping, validate_label};

/// Names of the columns the engine consumes
///
/// Matching against headers is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub reference: String,
    pub amount: String,
    pub date: String,
    pub service_name: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            reference: "Transaction_reference".to_string(),
            amount: "Amount".to_string(),
            date: "Date".to_string(),
            service_name: "Service_name".to_string(),
        }
    }
}

impl ColumnMapping {
    /// All consumed column names
    pub fn columns(&self) -> [&str; 4] {
        [
            self.reference.as_str(),
            self.amount.as_str(),
            self.date.as_str(),
            self.service_name.as_str(),
        ]
    }
}

/// Settings for one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Column names shared by both ledgers
    pub columns: ColumnMapping,
    /// Field delimiter of the CSV input
    pub delimiter: u8,
    /// Source label of ledger A
    pub label_a: String,
    /// Source label of ledger B
    pub label_b: String,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            delimiter: b',',
            label_a: "A".to_string(),
            label_b: "B".to_string(),
        }
    }
}

impl ReconciliationConfig {
    /// Create a configuration with default columns and labels
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source labels of both ledgers
    pub fn labels(mut self, label_a: impl Into<String>, label_b: impl Into<String>) -> Self {
        self.label_a = label_a.into();
        self.label_b = label_b.into();
        self
    }

    /// Set the CSV delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Replace the column mapping
    pub fn columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    /// Label for the given side
    pub fn label(&self, side: LedgerSide) -> &str {
        match side {
            LedgerSide::A => &self.label_a,
            LedgerSide::B => &self.label_b,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ReconResult<()> {
        validate_column_mapping(&self.columns)?;
        validate_label(&self.label_a)?;
        validate_label(&self.label_b)?;

        if self.delimiter == b'"' || self.delimiter == b'\n' || self.delimiter == b'\r' {
            return Err(ReconError::Configuration(format!(
                "Delimiter {:?} cannot be used",
                self.delimiter as char
            )));
        }

        Ok(())
    }
}
