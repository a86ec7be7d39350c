//! Alternative amount parsing for exports with formatted numbers

use bigdecimal::BigDecimal;

use crate::traits::{parse_plain_decimal, AmountParser};

/// Lenient amount parser for human-formatted exports
///
/// Accepts grouping commas and spaces (`1,250.00`, `1 250`) and a leading or
/// trailing alphabetic currency code (`Rwf 1,250`, `1250 RWF`). Anything
/// else left over after stripping those is rejected, exponent notation
/// included.
pub struct LenientAmountParser;

impl AmountParser for LenientAmountParser {
    fn parse_amount(&self, text: &str) -> Option<BigDecimal> {
        let trimmed = text
            .trim()
            .trim_start_matches(|c: char| c.is_ascii_alphabetic())
            .trim_end_matches(|c: char| c.is_ascii_alphabetic())
            .trim();

        let cleaned: String = trimmed
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();

        if cleaned.is_empty() {
            return None;
        }

        parse_plain_decimal(&cleaned)
    }
}
