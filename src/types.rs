//! Core types and data structures for the reconciliation engine

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Which of the two reconciled ledgers a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerSide {
    /// The source system's export
    A,
    /// The counterparty's export
    B,
}

impl LedgerSide {
    /// Returns the other side of the reconciliation
    pub fn opposite(&self) -> LedgerSide {
        match self {
            LedgerSide::A => LedgerSide::B,
            LedgerSide::B => LedgerSide::A,
        }
    }
}

impl fmt::Display for LedgerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerSide::A => write!(f, "A"),
            LedgerSide::B => write!(f, "B"),
        }
    }
}

/// Transaction date as found in the input
///
/// Dates are only carried for display. Text that matches none of the known
/// layouts is kept as-is rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordDate {
    /// Successfully parsed timestamp
    Timestamp(NaiveDateTime),
    /// Unparseable or empty text, preserved verbatim
    Raw(String),
}

impl RecordDate {
    const DATETIME_FORMATS: [&'static str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];

    const DATE_FORMATS: [&'static str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

    /// Parse a date cell, falling back to the raw text
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return RecordDate::Timestamp(dt.naive_utc());
        }

        for format in Self::DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return RecordDate::Timestamp(dt);
            }
        }

        for format in Self::DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                    return RecordDate::Timestamp(dt);
                }
            }
        }

        RecordDate::Raw(text.to_string())
    }

    /// The parsed timestamp, if any
    pub fn as_timestamp(&self) -> Option<&NaiveDateTime> {
        match self {
            RecordDate::Timestamp(dt) => Some(dt),
            RecordDate::Raw(_) => None,
        }
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDate::Timestamp(dt) => write!(f, "{}", dt),
            RecordDate::Raw(raw) => write!(f, "{}", raw),
        }
    }
}

/// One transaction row from a ledger export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Reconciliation key; may be empty and is not unique within a ledger
    pub reference: String,
    /// Transaction amount, zero when the cell was missing or malformed
    pub amount: BigDecimal,
    /// Transaction date, display only
    pub date: RecordDate,
    /// Descriptive service name, display only
    pub service_name: String,
    /// Every original column and its value
    pub raw_fields: HashMap<String, String>,
}

impl TransactionRecord {
    /// Create a record without passthrough columns
    pub fn new(
        reference: String,
        amount: BigDecimal,
        date: RecordDate,
        service_name: String,
    ) -> Self {
        Self {
            reference,
            amount,
            date,
            service_name,
            raw_fields: HashMap::new(),
        }
    }

    /// Look up an original column value
    pub fn field(&self, column: &str) -> Option<&str> {
        self.raw_fields.get(column).map(String::as_str)
    }
}

/// Why an amount cell resolved to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountIssue {
    /// The row has no cell for the amount column
    MissingColumn,
    /// The cell is empty or whitespace
    Empty,
    /// The cell holds text that is not a number
    Invalid,
}

/// Non-fatal, per-row note that an amount was substituted with zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldParseWarning {
    /// 1-based data row number (the header is row 0)
    pub row: usize,
    /// Column the amount was read from
    pub column: String,
    /// Original cell text (empty when the cell was missing)
    pub value: String,
    /// What went wrong
    pub issue: AmountIssue,
}

impl fmt::Display for FieldParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: {:?} amount in column '{}' ({:?}), using 0",
            self.row, self.issue, self.column, self.value
        )
    }
}

/// A parsed ledger export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Which side of the reconciliation this ledger is
    pub side: LedgerSide,
    /// Source label shown to users (e.g. the system name)
    pub label: String,
    /// Column headers in input order
    pub headers: Vec<String>,
    /// Records in input order
    pub records: Vec<TransactionRecord>,
    /// Amount cells that were substituted with zero
    pub warnings: Vec<FieldParseWarning>,
    /// Rows dropped because every cell was blank
    pub skipped_rows: usize,
    /// Consumed columns absent from the header row
    pub missing_columns: Vec<String>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new(side: LedgerSide, label: impl Into<String>) -> Self {
        Self {
            side,
            label: label.into(),
            headers: Vec::new(),
            records: Vec::new(),
            warnings: Vec::new(),
            skipped_rows: 0,
            missing_columns: Vec::new(),
        }
    }

    /// Create a ledger from already built records
    pub fn from_records(
        side: LedgerSide,
        label: impl Into<String>,
        records: Vec<TransactionRecord>,
    ) -> Self {
        Self {
            records,
            ..Self::new(side, label)
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of every record amount
    pub fn total(&self) -> BigDecimal {
        self.records.iter().map(|r| &r.amount).sum()
    }

    /// Summary of how parsing went
    pub fn parse_summary(&self) -> ParseSummary {
        ParseSummary {
            rows: self.records.len(),
            skipped_rows: self.skipped_rows,
            amount_warnings: self.warnings.len(),
            missing_columns: self.missing_columns.clone(),
        }
    }
}

/// Parse diagnostics carried into the report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParseSummary {
    /// Records kept
    pub rows: usize,
    /// Blank rows dropped
    pub skipped_rows: usize,
    /// Amounts substituted with zero
    pub amount_warnings: usize,
    /// Consumed columns absent from the header row
    pub missing_columns: Vec<String>,
}

/// An A record paired with the first B record sharing its reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    /// Record from ledger A
    pub record: TransactionRecord,
    /// Position of `record` in ledger A
    pub position: usize,
    /// First same-reference record from ledger B
    pub counterpart: TransactionRecord,
    /// Position of `counterpart` in ledger B
    pub counterpart_position: usize,
}

impl MatchPair {
    /// The shared reference
    pub fn reference(&self) -> &str {
        &self.record.reference
    }

    /// Amount on the A side
    pub fn amount_a(&self) -> &BigDecimal {
        &self.record.amount
    }

    /// Amount on the B side
    pub fn amount_b(&self) -> &BigDecimal {
        &self.counterpart.amount
    }

    /// A amount minus B amount
    pub fn amount_difference(&self) -> BigDecimal {
        &self.record.amount - &self.counterpart.amount
    }

    /// Whether both sides carry the same amount
    pub fn amounts_agree(&self) -> bool {
        self.record.amount == self.counterpart.amount
    }
}

/// A record whose reference never occurs in the other ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnmatchedRecord {
    pub record: TransactionRecord,
    /// Ledger the record belongs to
    pub side: LedgerSide,
    /// Source label of that ledger
    pub source: String,
    /// Position of the record in its ledger
    pub position: usize,
}

/// Summed amounts per partition and per ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub total_a: BigDecimal,
    pub total_b: BigDecimal,
    pub matched_a: BigDecimal,
    pub matched_b: BigDecimal,
    pub unmatched_a: BigDecimal,
    pub unmatched_b: BigDecimal,
}

impl Default for Totals {
    fn default() -> Self {
        Self {
            total_a: BigDecimal::from(0),
            total_b: BigDecimal::from(0),
            matched_a: BigDecimal::from(0),
            matched_b: BigDecimal::from(0),
            unmatched_a: BigDecimal::from(0),
            unmatched_b: BigDecimal::from(0),
        }
    }
}

impl Totals {
    /// Ledger A total minus ledger B total
    pub fn net_difference(&self) -> BigDecimal {
        &self.total_a - &self.total_b
    }

    /// Whether `total_a == matched_a + unmatched_a`
    pub fn a_balances(&self) -> bool {
        self.total_a == &self.matched_a + &self.unmatched_a
    }

    /// Whether `total_b == matched_b + unmatched_b`
    ///
    /// Only guaranteed when no B record is shared by several A records and
    /// no B record is shadowed by an earlier one with the same reference.
    pub fn b_balances(&self) -> bool {
        self.total_b == &self.matched_b + &self.unmatched_b
    }

    /// Whether both partition identities hold
    pub fn is_consistent(&self) -> bool {
        self.a_balances() && self.b_balances()
    }
}

/// Errors that can occur in the reconciliation engine
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    #[error("Input format error: {0}")]
    InputFormat(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Ledger source error: {0}")]
    Source(String),
}

/// Result type for reconciliation operations
pub type ReconResult<T> = Result<T, ReconError>;
