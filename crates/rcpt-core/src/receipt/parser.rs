//! Heuristic receipt parser composing the rule-based extractors.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::receipt::{PaymentMethod, ReceiptData};

use super::entities::{EntityRecognizer, SuffixEntityRecognizer};
use super::rules::{
    dates::{extract_date_and_time, CalendarDateDetector, DateDetector},
    detect_currency, extract_money_amounts, extract_subtotal, extract_tax, extract_total,
    extract_vendor, split_lines,
};

/// Result of receipt extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted receipt record.
    pub receipt: ReceiptData,
    /// Transaction time, when the header carried one.
    pub time: Option<String>,
    /// Subtotal line amount.
    pub subtotal: Option<Decimal>,
    /// Payment method keyword.
    pub payment_method: Option<PaymentMethod>,
    /// Every positive amount found, ascending.
    pub amounts: Vec<Decimal>,
    /// One entry per core field that could not be extracted.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for receipt parsing.
///
/// Parsing never fails: fields that cannot be recovered are left absent
/// and the record always carries the transcript.
pub trait ReceiptParser {
    /// Parse a receipt from its OCR transcript.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Offline, rule-based receipt parser.
pub struct HeuristicReceiptParser {
    /// Organization-name recognizer for the vendor fallback.
    entities: Box<dyn EntityRecognizer>,
    /// General date recognizer for the header scan.
    dates: Box<dyn DateDetector>,
    /// Whether to fill the tax field.
    extract_tax: bool,
    /// Whether to fill the currency field.
    detect_currency: bool,
    /// Currency used when detection finds none.
    default_currency: Option<String>,
}

impl HeuristicReceiptParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            entities: Box::new(SuffixEntityRecognizer::new()),
            dates: Box::new(CalendarDateDetector::new()),
            extract_tax: false,
            detect_currency: false,
            default_currency: None,
        }
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_tax_extraction(config.extract_tax)
            .with_currency_detection(config.detect_currency)
            .with_default_currency(config.default_currency.clone())
    }

    /// Set the organization-name recognizer.
    pub fn with_entity_recognizer(mut self, recognizer: impl EntityRecognizer + 'static) -> Self {
        self.entities = Box::new(recognizer);
        self
    }

    /// Set the date detector.
    pub fn with_date_detector(mut self, detector: impl DateDetector + 'static) -> Self {
        self.dates = Box::new(detector);
        self
    }

    /// Set tax extraction.
    pub fn with_tax_extraction(mut self, enabled: bool) -> Self {
        self.extract_tax = enabled;
        self
    }

    /// Set currency detection.
    pub fn with_currency_detection(mut self, enabled: bool) -> Self {
        self.detect_currency = enabled;
        self
    }

    /// Set the fallback currency for detection.
    pub fn with_default_currency(mut self, currency: Option<String>) -> Self {
        self.default_currency = currency;
        self
    }
}

impl Default for HeuristicReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for HeuristicReceiptParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing receipt from {} characters of text", text.len());

        let lines = split_lines(text);
        let amounts = extract_money_amounts(text);
        let date_time = extract_date_and_time(text, self.dates.as_ref());

        let mut receipt = ReceiptData::new(text);
        receipt.vendor = extract_vendor(&lines, self.entities.as_ref());
        receipt.date = date_time.date;
        receipt.total = extract_total(&lines, &amounts);

        if self.extract_tax {
            receipt.tax = extract_tax(&lines);
        }
        if self.detect_currency {
            receipt.currency = detect_currency(text).or_else(|| self.default_currency.clone());
        }

        let warnings: Vec<String> = receipt
            .missing_fields()
            .into_iter()
            .map(|field| format!("Could not extract {}", field))
            .collect();

        debug!(
            "Extracted receipt vendor={:?} date={:?} total={:?} ({} lines, {} amounts)",
            receipt.vendor,
            receipt.date,
            receipt.total,
            lines.len(),
            amounts.len()
        );

        ExtractionResult {
            time: date_time.time,
            subtotal: extract_subtotal(&lines),
            payment_method: PaymentMethod::detect(text),
            receipt,
            amounts,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::entities::NoEntities;
    use crate::receipt::rules::DateMatch;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const RECEIPT: &str = "ACME Coffee Shop
123 Main St
Date: 04/13/2025 08:15
Latte 4.50
Muffin 3.25
Subtotal $7.75
Tax $0.62
Total: $8.37
VISA **** 1234";

    #[test]
    fn test_parse_basic_receipt() {
        let result = HeuristicReceiptParser::new().parse(RECEIPT);
        let receipt = &result.receipt;

        assert_eq!(receipt.vendor.as_deref(), Some("ACME Coffee Shop"));
        assert_eq!(receipt.date.as_deref(), Some("04/13/2025"));
        assert_eq!(receipt.total, Some(dec("8.37")));
        assert_eq!(receipt.tax, None);
        assert_eq!(receipt.currency, None);
        assert_eq!(receipt.raw_text, RECEIPT);

        assert_eq!(result.time.as_deref(), Some("08:15"));
        assert_eq!(result.subtotal, Some(dec("7.75")));
        assert_eq!(result.payment_method, Some(PaymentMethod::Visa));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_optional_fields_from_config() {
        let config = ExtractionConfig {
            extract_tax: true,
            detect_currency: true,
            ..ExtractionConfig::default()
        };
        let result = HeuristicReceiptParser::from_config(&config).parse(RECEIPT);

        assert_eq!(result.receipt.tax, Some(dec("0.62")));
        assert_eq!(result.receipt.currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_default_currency() {
        let parser = HeuristicReceiptParser::new()
            .with_currency_detection(true)
            .with_default_currency(Some("CAD".to_string()));
        let result = parser.parse("Corner Store\nTotal 4.00");
        assert_eq!(result.receipt.currency.as_deref(), Some("CAD"));
    }

    #[test]
    fn test_empty_transcript() {
        let result = HeuristicReceiptParser::new().parse("");
        assert!(result.receipt.is_raw_only());
        assert_eq!(result.receipt.raw_text, "");
        assert_eq!(result.warnings.len(), 3);
        assert!(result.amounts.is_empty());
    }

    #[test]
    fn test_form_feed_separates_lines() {
        let result = HeuristicReceiptParser::new().parse("ACME Market\u{c}Total 5.00");
        assert_eq!(result.receipt.vendor.as_deref(), Some("ACME Market"));
        assert_eq!(result.receipt.total, Some(dec("5.00")));
    }

    #[test]
    fn test_custom_collaborators() {
        struct OneDate;

        impl DateDetector for OneDate {
            fn detect(&self, _: &str) -> Vec<DateMatch> {
                vec![DateMatch::new("1 Jan 2030")]
            }
        }

        let parser = HeuristicReceiptParser::new()
            .with_entity_recognizer(NoEntities)
            .with_date_detector(OneDate);
        let result = parser.parse("12:00\nthanks\nTotal 2.00");

        assert_eq!(result.receipt.date.as_deref(), Some("1 Jan 2030"));
        // "thanks" is lowercase and not the first line
        assert_eq!(result.receipt.vendor, None);
        assert_eq!(result.warnings, vec!["Could not extract vendor".to_string()]);
    }
}
