//! Reference matching between two ledgers

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ledger::LedgerIndex;
use crate::types::*;

/// The three partitions produced by matching
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// A records with a counterpart, in A order
    pub matched: Vec<MatchPair>,
    /// A records whose reference is absent from B, in A order
    pub unmatched_a: Vec<UnmatchedRecord>,
    /// B records whose reference is absent from A, in B order
    pub unmatched_b: Vec<UnmatchedRecord>,
}

/// Pairs records of ledger A with records of ledger B by reference
pub struct Matcher;

impl Matcher {
    /// Partition both ledgers by reference
    ///
    /// Each A record is paired with the first B record carrying the same
    /// reference. The B record is not consumed: several A records with one
    /// reference all pair with the same B record. A B record is unmatched
    /// only when its reference never occurs in A.
    pub fn match_ledgers(ledger_a: &Ledger, index_b: &LedgerIndex<'_>) -> MatchOutcome {
        let ledger_b = index_b.ledger();
        let mut outcome = MatchOutcome::default();

        for (position, record) in ledger_a.records.iter().enumerate() {
            match index_b.first(&record.reference) {
                Some((counterpart_position, counterpart)) => {
                    outcome.matched.push(MatchPair {
                        record: record.clone(),
                        position,
                        counterpart: counterpart.clone(),
                        counterpart_position,
                    });
                }
                None => outcome
                    .unmatched_a
                    .push(unmatched(ledger_a, position, record)),
            }
        }

        let index_a = LedgerIndex::build(ledger_a);
        outcome.unmatched_b = ledger_b
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| !index_a.contains(&record.reference))
            .map(|(position, record)| unmatched(ledger_b, position, record))
            .collect();

        debug!(
            matched = outcome.matched.len(),
            unmatched_a = outcome.unmatched_a.len(),
            unmatched_b = outcome.unmatched_b.len(),
            "matched ledgers"
        );

        outcome
    }
}

fn unmatched(ledger: &Ledger, position: usize, record: &TransactionRecord) -> UnmatchedRecord {
    UnmatchedRecord {
        record: record.clone(),
        side: ledger.side,
        source: ledger.label.clone(),
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn record(reference: &str, amount: i64) -> TransactionRecord {
        TransactionRecord::new(
            reference.to_string(),
            BigDecimal::from(amount),
            RecordDate::Raw(String::new()),
            String::new(),
        )
    }

    fn ledgers(a: &[(&str, i64)], b: &[(&str, i64)]) -> (Ledger, Ledger) {
        let build = |side, label: &str, rows: &[(&str, i64)]| {
            Ledger::from_records(
                side,
                label,
                rows.iter().map(|(r, amt)| record(r, *amt)).collect(),
            )
        };
        (
            build(LedgerSide::A, "DDIN", a),
            build(LedgerSide::B, "Efashe", b),
        )
    }

    fn run(a: &Ledger, b: &Ledger) -> MatchOutcome {
        let index_b = LedgerIndex::build(b);
        Matcher::match_ledgers(a, &index_b)
    }

    #[test]
    fn test_basic_partitioning() {
        let (a, b) = ledgers(&[("T1", 100), ("T2", 50)], &[("T1", 100), ("T3", 30)]);
        let outcome = run(&a, &b);

        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].reference(), "T1");
        assert_eq!(outcome.matched[0].position, 0);
        assert_eq!(outcome.matched[0].counterpart_position, 0);

        assert_eq!(outcome.unmatched_a.len(), 1);
        assert_eq!(outcome.unmatched_a[0].record.reference, "T2");
        assert_eq!(outcome.unmatched_a[0].side, LedgerSide::A);
        assert_eq!(outcome.unmatched_a[0].source, "DDIN");
        assert_eq!(outcome.unmatched_a[0].position, 1);

        assert_eq!(outcome.unmatched_b.len(), 1);
        assert_eq!(outcome.unmatched_b[0].record.reference, "T3");
        assert_eq!(outcome.unmatched_b[0].source, "Efashe");
        assert_eq!(outcome.unmatched_b[0].position, 1);
    }

    #[test]
    fn test_first_candidate_wins_and_is_not_consumed() {
        let (a, b) = ledgers(
            &[("T1", 10), ("T1", 20), ("T1", 30)],
            &[("T1", 7), ("T1", 8)],
        );
        let outcome = run(&a, &b);

        assert_eq!(outcome.matched.len(), 3);
        for pair in &outcome.matched {
            assert_eq!(pair.counterpart_position, 0);
            assert_eq!(pair.amount_b(), &BigDecimal::from(7));
        }
        let positions: Vec<usize> = outcome.matched.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);

        // the second B record is neither matched nor unmatched
        assert!(outcome.unmatched_b.is_empty());
    }

    #[test]
    fn test_mismatched_amounts_still_match() {
        let (a, b) = ledgers(&[("T1", 100)], &[("T1", 90)]);
        let outcome = run(&a, &b);

        assert_eq!(outcome.matched.len(), 1);
        assert!(!outcome.matched[0].amounts_agree());
    }

    #[test]
    fn test_empty_ledger_a() {
        let (a, b) = ledgers(&[], &[("T1", 1), ("T2", 2)]);
        let outcome = run(&a, &b);

        assert!(outcome.matched.is_empty());
        assert!(outcome.unmatched_a.is_empty());
        let refs: Vec<&str> = outcome
            .unmatched_b
            .iter()
            .map(|u| u.record.reference.as_str())
            .collect();
        assert_eq!(refs, vec!["T1", "T2"]);
    }

    #[test]
    fn test_empty_ledger_b() {
        let (a, b) = ledgers(&[("T1", 1), ("T2", 2)], &[]);
        let outcome = run(&a, &b);

        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched_a.len(), 2);
        assert!(outcome.unmatched_b.is_empty());
    }

    #[test]
    fn test_blank_references_match_each_other() {
        let (a, b) = ledgers(&[("", 5), ("T1", 1)], &[("", 9)]);
        let outcome = run(&a, &b);

        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].reference(), "");
        assert_eq!(outcome.unmatched_a.len(), 1);
        assert!(outcome.unmatched_b.is_empty());
    }

    #[test]
    fn test_references_compare_exactly() {
        let (a, b) = ledgers(&[("t1", 1), ("T1 ", 1)], &[("T1", 1)]);
        let outcome = run(&a, &b);

        assert!(outcome.matched.is_empty());
        assert_eq!(outcome.unmatched_a.len(), 2);
        assert_eq!(outcome.unmatched_b.len(), 1);
    }

    #[test]
    fn test_unmatched_b_keeps_ledger_order() {
        let (a, b) = ledgers(&[("T2", 1)], &[("T9", 1), ("T2", 1), ("T5", 1), ("T7", 1)]);
        let outcome = run(&a, &b);

        let positions: Vec<usize> = outcome.unmatched_b.iter().map(|u| u.position).collect();
        assert_eq!(positions, vec![0, 2, 3]);
    }
}
