//! Exact decimal totals over reconciliation partitions

use bigdecimal::BigDecimal;
use tracing::debug;

use crate::reconciliation::MatchOutcome;
use crate::types::*;

/// Sums amounts per partition and per ledger
pub struct Aggregator;

impl Aggregator {
    /// Compute every total of a reconciliation run
    ///
    /// Matched pairs contribute their A amount to `matched_a` and their B
    /// amount to `matched_b`. Ledger totals are summed from the ledgers
    /// directly, independent of the partitions.
    pub fn aggregate(ledger_a: &Ledger, ledger_b: &Ledger, outcome: &MatchOutcome) -> Totals {
        let totals = Totals {
            total_a: ledger_a.total(),
            total_b: ledger_b.total(),
            matched_a: outcome.matched.iter().map(MatchPair::amount_a).sum(),
            matched_b: outcome.matched.iter().map(MatchPair::amount_b).sum(),
            unmatched_a: sum_unmatched(&outcome.unmatched_a),
            unmatched_b: sum_unmatched(&outcome.unmatched_b),
        };

        debug!(
            total_a = %totals.total_a,
            total_b = %totals.total_b,
            matched_a = %totals.matched_a,
            matched_b = %totals.matched_b,
            "aggregated totals"
        );

        totals
    }
}

fn sum_unmatched(records: &[UnmatchedRecord]) -> BigDecimal {
    records.iter().map(|u| &u.record.amount).sum()
}
