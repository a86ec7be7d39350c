//! Record parsing from tabular exports

use bigdecimal::BigDecimal;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::Read;
use tracing::{debug, warn};

use crate::config::ColumnMapping;
use crate::traits::*;
use crate::types::*;

/// Turns raw rows into a typed [`Ledger`]
pub struct RecordParser {
    columns: ColumnMapping,
    delimiter: u8,
    amount_parser: Box<dyn AmountParser>,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(ColumnMapping::default())
    }
}

impl RecordParser {
    /// Create a parser with the strict decimal amount parser
    pub fn new(columns: ColumnMapping) -> Self {
        Self {
            columns,
            delimiter: b',',
            amount_parser: Box::new(DecimalAmountParser),
        }
    }

    /// Create a parser with a custom amount parser
    pub fn with_amount_parser(columns: ColumnMapping, amount_parser: Box<dyn AmountParser>) -> Self {
        Self {
            columns,
            delimiter: b',',
            amount_parser,
        }
    }

    /// Set the CSV field delimiter
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Column names this parser consumes
    pub fn columns(&self) -> &ColumnMapping {
        &self.columns
    }

    /// Parse a delimited byte stream with a header row
    ///
    /// Fails only when the stream is not tabular at all. Cells that are not
    /// valid UTF-8 are decoded lossily, and rows may be shorter or longer
    /// than the header.
    pub fn parse_csv<R: Read>(
        &self,
        side: LedgerSide,
        label: &str,
        input: R,
    ) -> ReconResult<Ledger> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers: Vec<String> = reader
            .byte_headers()
            .map_err(|e| ReconError::InputFormat(format!("ledger {}: {}", label, e)))?
            .iter()
            .map(|h| String::from_utf8_lossy(h).into_owned())
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ReconError::InputFormat(format!(
                "ledger {}: missing header row",
                label
            )));
        }

        let headers = unique_headers(label, headers);
        let mut ledger = self.empty_ledger(side, label, headers);

        for (index, row) in reader.byte_records().enumerate() {
            let row =
                row.map_err(|e| ReconError::InputFormat(format!("ledger {}: {}", label, e)))?;

            let mut fields = HashMap::with_capacity(row.len());
            let mut extra = 0;
            for (column, cell) in row.iter().enumerate() {
                let name = match ledger.headers.get(column) {
                    Some(header) => header.clone(),
                    None => loop {
                        extra += 1;
                        let name = format!("extra_{}", extra);
                        if !ledger.headers.contains(&name) {
                            break name;
                        }
                    },
                };
                fields.insert(name, String::from_utf8_lossy(cell).into_owned());
            }

            self.push_row(&mut ledger, index + 1, fields);
        }

        self.log_summary(&ledger);
        Ok(ledger)
    }

    /// Parse rows that are already split into column -> cell maps
    ///
    /// Headers are the sorted union of the row keys, since maps carry no
    /// column order.
    pub fn parse_rows<I>(&self, side: LedgerSide, label: &str, rows: I) -> Ledger
    where
        I: IntoIterator<Item = HashMap<String, String>>,
    {
        let rows: Vec<HashMap<String, String>> = rows.into_iter().collect();
        let headers: Vec<String> = rows
            .iter()
            .flat_map(|row| row.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut ledger = self.empty_ledger(side, label, headers);
        for (index, row) in rows.into_iter().enumerate() {
            self.push_row(&mut ledger, index + 1, row);
        }

        self.log_summary(&ledger);
        ledger
    }

    fn empty_ledger(&self, side: LedgerSide, label: &str, headers: Vec<String>) -> Ledger {
        let mut ledger = Ledger::new(side, label);

        ledger.missing_columns = self
            .columns
            .columns()
            .into_iter()
            .filter(|column| !headers.iter().any(|h| h.as_str() == *column))
            .map(|column| column.to_string())
            .collect();

        for column in &ledger.missing_columns {
            warn!(ledger = %label, column = %column, "consumed column missing from header");
        }

        ledger.headers = headers;
        ledger
    }

    fn push_row(&self, ledger: &mut Ledger, row: usize, fields: HashMap<String, String>) {
        if fields.values().all(|value| value.trim().is_empty()) {
            ledger.skipped_rows += 1;
            return;
        }

        let amount = match self.parse_amount(fields.get(&self.columns.amount)) {
            Ok(amount) => amount,
            Err(issue) => {
                let warning = FieldParseWarning {
                    row,
                    column: self.columns.amount.clone(),
                    value: fields.get(&self.columns.amount).cloned().unwrap_or_default(),
                    issue,
                };
                warn!(ledger = %ledger.label, "{}", warning);
                ledger.warnings.push(warning);
                BigDecimal::from(0)
            }
        };

        let text = |column: &str| fields.get(column).cloned().unwrap_or_default();
        let reference = text(&self.columns.reference);
        let date = RecordDate::parse(&text(&self.columns.date));
        let service_name = text(&self.columns.service_name);

        ledger.records.push(TransactionRecord {
            reference,
            amount,
            date,
            service_name,
            raw_fields: fields,
        });
    }

    fn parse_amount(&self, cell: Option<&String>) -> Result<BigDecimal, AmountIssue> {
        match cell {
            None => Err(AmountIssue::MissingColumn),
            Some(text) if text.trim().is_empty() => Err(AmountIssue::Empty),
            Some(text) => self
                .amount_parser
                .parse_amount(text)
                .ok_or(AmountIssue::Invalid),
        }
    }

    fn log_summary(&self, ledger: &Ledger) {
        debug!(
            ledger = %ledger.label,
            side = %ledger.side,
            records = ledger.records.len(),
            skipped = ledger.skipped_rows,
            amount_warnings = ledger.warnings.len(),
            "parsed ledger"
        );
    }
}

/// Rename repeated header names so no cell is overwritten
///
/// The first occurrence keeps its name and later ones get `_1`, `_2`, ...
/// appended, skipping names the header row already uses.
fn unique_headers(label: &str, headers: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = headers.iter().cloned().collect();
    let mut seen = HashSet::with_capacity(headers.len());
    let mut counts: HashMap<String, usize> = HashMap::new();

    headers
        .into_iter()
        .map(|header| {
            if seen.insert(header.clone()) {
                return header;
            }

            let count = counts.entry(header.clone()).or_insert(0);
            let renamed = loop {
                *count += 1;
                let candidate = format!("{}_{}", header, count);
                if !taken.contains(&candidate) {
                    break candidate;
                }
            };

            warn!(ledger = %label, header = %header, renamed = %renamed, "repeated header renamed");
            taken.insert(renamed.clone());
            seen.insert(renamed.clone());
            renamed
        })
        .collect()
}
