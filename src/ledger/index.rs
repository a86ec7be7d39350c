//! Reference lookup over a parsed ledger

use std::collections::HashMap;

use crate::types::*;

/// Maps each reference to the positions of the records carrying it
///
/// Positions are kept in ledger order. Empty and whitespace-only references
/// are ordinary keys, so unrelated records with blank references collide.
#[derive(Debug, Clone)]
pub struct LedgerIndex<'a> {
    ledger: &'a Ledger,
    positions: HashMap<&'a str, Vec<usize>>,
}

impl<'a> LedgerIndex<'a> {
    /// Build an index over every record of the ledger
    pub fn build(ledger: &'a Ledger) -> Self {
        let mut positions: HashMap<&'a str, Vec<usize>> = HashMap::new();

        for (position, record) in ledger.records.iter().enumerate() {
            positions
                .entry(record.reference.as_str())
                .or_default()
                .push(position);
        }

        Self { ledger, positions }
    }

    /// The indexed ledger
    pub fn ledger(&self) -> &'a Ledger {
        self.ledger
    }

    /// All records sharing the reference, in ledger order
    pub fn candidates(
        &self,
        reference: &str,
    ) -> impl Iterator<Item = (usize, &'a TransactionRecord)> + '_ {
        let ledger = self.ledger;
        self.positions
            .get(reference)
            .into_iter()
            .flatten()
            .map(move |&position| (position, &ledger.records[position]))
    }

    /// The earliest record carrying the reference
    pub fn first(&self, reference: &str) -> Option<(usize, &'a TransactionRecord)> {
        self.positions
            .get(reference)
            .and_then(|positions| positions.first())
            .map(|&position| (position, &self.ledger.records[position]))
    }

    /// Whether any record carries the reference
    pub fn contains(&self, reference: &str) -> bool {
        self.positions.contains_key(reference)
    }

    /// Number of distinct references
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// References held by more than one record, sorted
    pub fn duplicate_references(&self) -> Vec<&'a str> {
        let mut duplicates: Vec<&'a str> = self
            .positions
            .iter()
            .filter(|(_, positions)| positions.len() > 1)
            .map(|(reference, _)| *reference)
            .collect();
        duplicates.sort_unstable();
        duplicates
    }
}
