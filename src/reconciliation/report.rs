//! Immutable reconciliation result handed to presentation layers

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reconciliation::MatchOutcome;
use crate::types::*;

/// Outcome of one reconciliation run
///
/// Built once by the engine and read through accessors only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    id: Uuid,
    generated_at: NaiveDateTime,
    label_a: String,
    label_b: String,
    matched: Vec<MatchPair>,
    unmatched_a: Vec<UnmatchedRecord>,
    unmatched_b: Vec<UnmatchedRecord>,
    totals: Totals,
    parse_a: ParseSummary,
    parse_b: ParseSummary,
}

/// One A record next to its counterpart amount, if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow<'a> {
    pub position: usize,
    pub record: &'a TransactionRecord,
    /// `None` when the reference has no counterpart
    pub counterpart_amount: Option<&'a BigDecimal>,
}

impl ReconciliationReport {
    /// Bundle the outputs of a run
    pub fn new(ledger_a: &Ledger, ledger_b: &Ledger, outcome: MatchOutcome, totals: Totals) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: chrono::Utc::now().naive_utc(),
            label_a: ledger_a.label.clone(),
            label_b: ledger_b.label.clone(),
            matched: outcome.matched,
            unmatched_a: outcome.unmatched_a,
            unmatched_b: outcome.unmatched_b,
            totals,
            parse_a: ledger_a.parse_summary(),
            parse_b: ledger_b.parse_summary(),
        }
    }

    /// Unique identifier of this run
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the report was produced (UTC)
    pub fn generated_at(&self) -> NaiveDateTime {
        self.generated_at
    }

    /// Source label of a side
    pub fn label(&self, side: LedgerSide) -> &str {
        match side {
            LedgerSide::A => &self.label_a,
            LedgerSide::B => &self.label_b,
        }
    }

    pub fn matched(&self) -> &[MatchPair] {
        &self.matched
    }

    pub fn unmatched_a(&self) -> &[UnmatchedRecord] {
        &self.unmatched_a
    }

    pub fn unmatched_b(&self) -> &[UnmatchedRecord] {
        &self.unmatched_b
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    /// Parse diagnostics of a side
    pub fn parse_summary(&self, side: LedgerSide) -> &ParseSummary {
        match side {
            LedgerSide::A => &self.parse_a,
            LedgerSide::B => &self.parse_b,
        }
    }

    /// Unmatched records of both ledgers, A first, each tagged with its source
    pub fn unmatched(&self) -> impl Iterator<Item = &UnmatchedRecord> {
        self.unmatched_a.iter().chain(self.unmatched_b.iter())
    }

    /// Matched pairs whose amounts differ
    pub fn discrepancies(&self) -> impl Iterator<Item = &MatchPair> {
        self.matched.iter().filter(|pair| !pair.amounts_agree())
    }

    /// Every A record in ledger order with its counterpart amount
    pub fn comparison(&self) -> Vec<ComparisonRow<'_>> {
        let mut rows = Vec::with_capacity(self.matched.len() + self.unmatched_a.len());
        let mut matched = self.matched.iter().peekable();
        let mut unmatched = self.unmatched_a.iter().peekable();

        loop {
            let take_matched = match (matched.peek(), unmatched.peek()) {
                (Some(pair), Some(record)) => pair.position < record.position,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };

            let row = if take_matched {
                matched.next().map(|pair| ComparisonRow {
                    position: pair.position,
                    record: &pair.record,
                    counterpart_amount: Some(pair.amount_b()),
                })
            } else {
                unmatched.next().map(|u| ComparisonRow {
                    position: u.position,
                    record: &u.record,
                    counterpart_amount: None,
                })
            };
            rows.extend(row);
        }

        rows
    }

    /// Whether every record on both sides found a counterpart
    pub fn is_fully_matched(&self) -> bool {
        self.unmatched_a.is_empty() && self.unmatched_b.is_empty()
    }
}
