//! Money amount extraction for receipts.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::MONEY;
use super::{ExtractionMatch, FieldExtractor};

/// Two amounts closer than this are the same value.
pub const DEDUP_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Money token extractor.
///
/// Yields every token the money pattern recognizes, in text order, with no
/// filtering beyond "parses as a decimal".
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        MONEY
            .find_iter(text)
            .filter_map(|m| {
                parse_money_amount(m.as_str())
                    .map(|amount| ExtractionMatch::new(amount, m.start(), m.end(), m.as_str()))
            })
            .collect()
    }
}

/// Parse a money token such as "$1,234.56" or "12".
///
/// Strips the currency symbol, thousands separators and whitespace.
/// Returns `None` for anything that does not parse as a decimal.
pub fn parse_money_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    Decimal::from_str(&cleaned).ok()
}

/// All positive money amounts in `text`, deduplicated and ascending.
pub fn extract_money_amounts(text: &str) -> Vec<Decimal> {
    let mut amounts: Vec<Decimal> = Vec::new();

    for found in AmountExtractor::new().extract_all(text) {
        let amount = found.value;
        if amount <= Decimal::ZERO {
            continue;
        }
        // The same amount often appears twice, e.g. with and without "$"
        let is_duplicate = amounts
            .iter()
            .any(|existing| (*existing - amount).abs() < DEDUP_TOLERANCE);
        if !is_duplicate {
            amounts.push(amount);
        }
    }

    amounts.sort();
    amounts
}

/// The first money token on a single line, if it parses.
///
/// Unlike [`extract_money_amounts`] this does not reject zero.
pub fn first_amount_in_line(line: &str) -> Option<Decimal> {
    AmountExtractor::new().extract(line).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_money_amount() {
        assert_eq!(parse_money_amount("$1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_money_amount("$ 12.50"), Some(dec("12.50")));
        assert_eq!(parse_money_amount("45"), Some(dec("45")));
        assert_eq!(parse_money_amount("$"), None);
    }

    #[test]
    fn test_extract_amounts_sorted() {
        let amounts = extract_money_amounts("Subtotal $12.50 Tax $1.00 Total $13.50");
        assert_eq!(amounts, vec![dec("1.00"), dec("12.50"), dec("13.50")]);
    }

    #[test]
    fn test_extract_amounts_dedup() {
        let amounts = extract_money_amounts("$10.00 and 10.00 again");
        assert_eq!(amounts, vec![dec("10.00")]);
    }

    #[test]
    fn test_dedup_tolerance_is_strict() {
        // 0.01 apart is not "closer than 0.01"
        let amounts = extract_money_amounts("5.00 5.01");
        assert_eq!(amounts, vec![dec("5.00"), dec("5.01")]);
    }

    #[test]
    fn test_extract_amounts_rejects_zero() {
        let amounts = extract_money_amounts("Change $0.00\nCash 20.00");
        assert_eq!(amounts, vec![dec("20.00")]);
    }

    #[test]
    fn test_bare_integers_are_amounts() {
        let amounts = extract_money_amounts("TOTAL 45");
        assert_eq!(amounts, vec![dec("45")]);
    }

    #[test]
    fn test_thousands_separator() {
        let amounts = extract_money_amounts("TV $1,299.99");
        assert_eq!(amounts, vec![dec("1299.99")]);
    }

    #[test]
    fn test_oversized_token_skipped() {
        // More digits than a Decimal can hold
        let amounts = extract_money_amounts("REF 123456789012345678901234567890123 paid 4.00");
        assert_eq!(amounts, vec![dec("4.00")]);
    }

    #[test]
    fn test_first_amount_in_line() {
        assert_eq!(first_amount_in_line("Total: $5.00"), Some(dec("5.00")));
        assert_eq!(first_amount_in_line("Total 0.00"), Some(dec("0.00")));
        assert_eq!(first_amount_in_line("Total"), None);
    }

    #[test]
    fn test_extract_all_positions() {
        let extractor = AmountExtractor::new();
        let text = "Cash $20.00";
        let found = extractor.extract(text).unwrap();
        assert_eq!(found.value, dec("20.00"));
        assert_eq!(&text[found.position.0..found.position.1], found.source);
    }
}
