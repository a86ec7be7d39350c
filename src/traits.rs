//! Traits for ledger ingestion and extensibility

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::str::FromStr;

use crate::types::*;

/// Source of the raw bytes of one ledger export
///
/// Fetching is the caller's concern (uploads, HTTP, files); the engine only
/// consumes the bytes a source hands over.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Name used in log output
    fn name(&self) -> &str;

    /// Produce the full delimited byte stream, header row included
    async fn fetch(&self) -> ReconResult<Vec<u8>>;
}

/// Trait for turning an amount cell into a decimal value
pub trait AmountParser: Send + Sync {
    /// Parse the cell text, returning `None` when it is not a number
    fn parse_amount(&self, text: &str) -> Option<BigDecimal>;
}

/// Default amount parser: a plain decimal literal, surrounding whitespace allowed
///
/// Exponent notation (`1e5`) is rejected. A large exponent would make every
/// later sum expand the value to that many digits.
pub struct DecimalAmountParser;

impl AmountParser for DecimalAmountParser {
    fn parse_amount(&self, text: &str) -> Option<BigDecimal> {
        parse_plain_decimal(text.trim())
    }
}

/// Parse a decimal literal without an exponent part
pub(crate) fn parse_plain_decimal(text: &str) -> Option<BigDecimal> {
    if text.contains(['e', 'E']) {
        return None;
    }

    BigDecimal::from_str(text).ok()
}
