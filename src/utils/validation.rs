//! Validation utilities

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::config::ColumnMapping;
use crate::reconciliation::ReconciliationReport;
use crate::types::*;

/// Validate that every consumed column is named and distinct
pub fn validate_column_mapping(columns: &ColumnMapping) -> ReconResult<()> {
    let mut seen = HashSet::new();

    for column in columns.columns() {
        if column.trim().is_empty() {
            return Err(ReconError::Configuration(
                "Column names cannot be empty".to_string(),
            ));
        }

        if !seen.insert(column) {
            return Err(ReconError::Configuration(format!(
                "Column '{}' is mapped to more than one field",
                column
            )));
        }
    }

    Ok(())
}

/// Validate that a source label is usable
pub fn validate_label(label: &str) -> ReconResult<()> {
    if label.trim().is_empty() {
        return Err(ReconError::Configuration(
            "Source label cannot be empty".to_string(),
        ));
    }

    if label.chars().count() > 50 {
        return Err(ReconError::Configuration(
            "Source label cannot exceed 50 characters".to_string(),
        ));
    }

    Ok(())
}

/// Cross-checks of a finished reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub is_consistent: bool,
    pub issues: Vec<String>,
    /// B records paired with more than one A record
    pub shared_counterparts: usize,
    /// B records whose reference occurs in A but were never picked
    pub shadowed_b_records: usize,
    /// Amounts substituted with zero across both ledgers
    pub amount_warnings: usize,
    /// Matched pairs whose amounts differ
    pub amount_discrepancies: usize,
    pub a_side_gap: BigDecimal,
    pub b_side_gap: BigDecimal,
}

/// Check the partition identities of a report and explain any gap
///
/// The A identity always holds. The B identity breaks when a B record is
/// shared by several A records (counted once per pair) or shadowed by an
/// earlier B record with the same reference (counted nowhere).
pub fn check_report_integrity(report: &ReconciliationReport) -> IntegrityReport {
    let totals = report.totals();
    let mut issues = Vec::new();

    let a_side_gap = &totals.total_a - (&totals.matched_a + &totals.unmatched_a);
    let b_side_gap = &totals.total_b - (&totals.matched_b + &totals.unmatched_b);

    if !totals.a_balances() {
        issues.push(format!(
            "Ledger {} does not balance: total = {}, matched + unmatched = {}",
            report.label(LedgerSide::A),
            totals.total_a,
            &totals.matched_a + &totals.unmatched_a
        ));
    }

    if !totals.b_balances() {
        issues.push(format!(
            "Ledger {} does not balance: total = {}, matched + unmatched = {}",
            report.label(LedgerSide::B),
            totals.total_b,
            &totals.matched_b + &totals.unmatched_b
        ));
    }

    let mut uses: HashMap<usize, usize> = HashMap::new();
    for pair in report.matched() {
        *uses.entry(pair.counterpart_position).or_insert(0) += 1;
    }

    let shared_counterparts = uses.values().filter(|&&count| count > 1).count();
    if shared_counterparts > 0 {
        issues.push(format!(
            "{} record(s) in {} are paired with more than one record in {}",
            shared_counterparts,
            report.label(LedgerSide::B),
            report.label(LedgerSide::A)
        ));
    }

    let rows_b = report.parse_summary(LedgerSide::B).rows;
    let shadowed_b_records = rows_b.saturating_sub(uses.len() + report.unmatched_b().len());
    if shadowed_b_records > 0 {
        issues.push(format!(
            "{} record(s) in {} share a reference with an earlier record and were never paired",
            shadowed_b_records,
            report.label(LedgerSide::B)
        ));
    }

    let amount_warnings = report.parse_summary(LedgerSide::A).amount_warnings
        + report.parse_summary(LedgerSide::B).amount_warnings;
    let amount_discrepancies = report.discrepancies().count();

    IntegrityReport {
        is_consistent: totals.is_consistent(),
        issues,
        shared_counterparts,
        shadowed_b_records,
        amount_warnings,
        amount_discrepancies,
        a_side_gap,
        b_side_gap,
    }
}
