//! Reconciliation pipeline orchestration

use std::io::Read;
use tracing::info;

use crate::config::ReconciliationConfig;
use crate::ledger::{LedgerIndex, RecordParser};
use crate::reconciliation::{Aggregator, Matcher, ReconciliationReport};
use crate::traits::*;
use crate::types::*;

/// Run the pure pipeline over two parsed ledgers
///
/// Index(B) -> Matcher(A, Index(B)) -> Aggregator -> Report. Cannot fail.
pub fn reconcile(ledger_a: &Ledger, ledger_b: &Ledger) -> ReconciliationReport {
    let index_b = LedgerIndex::build(ledger_b);
    let outcome = Matcher::match_ledgers(ledger_a, &index_b);
    let totals = Aggregator::aggregate(ledger_a, ledger_b, &outcome);
    ReconciliationReport::new(ledger_a, ledger_b, outcome, totals)
}

/// Reconciliation engine: parses both exports and reconciles them
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
    parser: RecordParser,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        let config = ReconciliationConfig::default();
        let parser = RecordParser::new(config.columns.clone()).delimiter(config.delimiter);
        Self { config, parser }
    }

    /// Create an engine with a validated custom configuration
    pub fn with_config(config: ReconciliationConfig) -> ReconResult<Self> {
        config.validate()?;
        let parser = RecordParser::new(config.columns.clone()).delimiter(config.delimiter);
        Ok(Self { config, parser })
    }

    /// Replace the amount parser used for both ledgers
    pub fn with_amount_parser(mut self, amount_parser: Box<dyn AmountParser>) -> Self {
        self.parser = RecordParser::with_amount_parser(self.config.columns.clone(), amount_parser)
            .delimiter(self.config.delimiter);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Parser configured for this engine
    pub fn parser(&self) -> &RecordParser {
        &self.parser
    }

    /// Reconcile two already parsed ledgers
    pub fn reconcile(&self, ledger_a: &Ledger, ledger_b: &Ledger) -> ReconciliationReport {
        let report = reconcile(ledger_a, ledger_b);

        info!(
            report_id = %report.id(),
            ledger_a = %report.label(LedgerSide::A),
            ledger_b = %report.label(LedgerSide::B),
            matched = report.matched().len(),
            unmatched_a = report.unmatched_a().len(),
            unmatched_b = report.unmatched_b().len(),
            net_difference = %report.totals().net_difference(),
            "reconciliation complete"
        );

        report
    }

    /// Parse one CSV export as the given side
    pub fn parse_ledger<R: Read>(&self, side: LedgerSide, input: R) -> ReconResult<Ledger> {
        self.parser.parse_csv(side, self.config.label(side), input)
    }

    /// Parse two CSV exports and reconcile them
    ///
    /// Both inputs are parsed before any matching; a format error in either
    /// aborts the run.
    pub fn reconcile_csv<A: Read, B: Read>(
        &self,
        input_a: A,
        input_b: B,
    ) -> ReconResult<ReconciliationReport> {
        let ledger_a = self.parse_ledger(LedgerSide::A, input_a)?;
        let ledger_b = self.parse_ledger(LedgerSide::B, input_b)?;
        Ok(self.reconcile(&ledger_a, &ledger_b))
    }

    /// Fetch both exports from their sources and reconcile them
    pub async fn reconcile_sources<A, B>(
        &self,
        source_a: &A,
        source_b: &B,
    ) -> ReconResult<ReconciliationReport>
    where
        A: LedgerSource + ?Sized,
        B: LedgerSource + ?Sized,
    {
        let bytes_a = source_a.fetch().await?;
        info!(source = %source_a.name(), bytes = bytes_a.len(), "fetched ledger A");

        let bytes_b = source_b.fetch().await?;
        info!(source = %source_b.name(), bytes = bytes_b.len(), "fetched ledger B");

        self.reconcile_csv(bytes_a.as_slice(), bytes_b.as_slice())
    }
}
