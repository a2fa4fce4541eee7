//! End-to-end extraction over realistic transcripts.

use std::str::FromStr;

use pretty_assertions::assert_eq;
use rcpt_core::receipt::rules::{extract_money_amounts, extract_total, extract_vendor, split_lines};
use rcpt_core::{
    is_meaningful_transcript, HeuristicReceiptParser, NoEntities, PaymentMethod, ReceiptParser,
};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const GROCERY: &str = "\
WHOLE FOODS MARKET
1440 Broadway
New York NY 10018
Tel 212-555-0100
03/14/2024 6:42 PM
ORGANIC BANANAS 2.49
ALMOND MILK 4.99
SOURDOUGH 1,005.00
SUBTOTAL 1,012.48
SALES TAX 0.00
TOTAL 1,012.48
VISA ****5521
Thank you for shopping!
";

const DINER: &str = "

  Joe's Diner LLC
12:05
pancakes 8.50
coffee 2.00
Amount 10.50
cash 20.00
change 9.50
";

#[test]
fn grocery_receipt() {
    let result = HeuristicReceiptParser::new().parse(GROCERY);

    assert_eq!(result.receipt.vendor.as_deref(), Some("WHOLE FOODS MARKET"));
    assert_eq!(result.receipt.date.as_deref(), Some("03/14/2024"));
    assert_eq!(result.time.as_deref(), Some("6:42"));
    assert_eq!(result.receipt.total, Some(dec("1012.48")));
    assert_eq!(result.subtotal, Some(dec("1012.48")));
    assert_eq!(result.payment_method, Some(PaymentMethod::Visa));
    assert!(result.warnings.is_empty());
}

#[test]
fn receipt_without_total_label() {
    let result = HeuristicReceiptParser::new()
        .with_entity_recognizer(NoEntities)
        .parse(DINER);

    assert_eq!(result.receipt.vendor.as_deref(), Some("Joe's Diner LLC"));
    assert_eq!(result.receipt.date, None);
    assert_eq!(result.time.as_deref(), Some("12:05"));
    assert_eq!(result.warnings, vec!["Could not extract date".to_string()]);
    // Largest amount wins without a "total" line
    assert_eq!(result.receipt.total, Some(dec("20.00")));
    assert_eq!(result.payment_method, Some(PaymentMethod::Cash));
}

#[test]
fn parsing_is_idempotent() {
    let parser = HeuristicReceiptParser::new().with_tax_extraction(true);
    for text in [GROCERY, DINER, "", "   \n\n", "TOTAL"] {
        let first = parser.parse(text);
        let second = parser.parse(text);
        assert_eq!(first.receipt, second.receipt);
        assert_eq!(first.receipt.raw_text, text);
    }
}

#[test]
fn documented_examples() {
    assert_eq!(
        extract_money_amounts("Subtotal $12.50 Tax $1.00 Total $13.50"),
        vec![dec("1.00"), dec("12.50"), dec("13.50")]
    );
    assert_eq!(extract_money_amounts("$10.00 and 10.00 again"), vec![dec("10.00")]);

    let lines = split_lines("Subtotal 9.00\nTotal 13.50");
    assert_eq!(extract_total(&lines, &[dec("9.00"), dec("13.50")]), Some(dec("13.50")));

    let lines = split_lines("Coffee 0.50\nBeans 45.00");
    assert_eq!(extract_total(&lines, &[dec("0.50"), dec("45.00")]), Some(dec("45.00")));

    let lines = split_lines("ACME Coffee Shop\n123 Main St\nTotal: $5.00");
    assert_eq!(extract_vendor(&lines, &NoEntities).as_deref(), Some("ACME Coffee Shop"));

    let result = HeuristicReceiptParser::new().parse("05/10/2024\nBlue Bottle\nTotal 6.00");
    assert_eq!(result.receipt.vendor.as_deref(), Some("Blue Bottle"));

    let result = HeuristicReceiptParser::new().parse("Store\nDate: 04/13/2025\nTotal 1.00");
    assert_eq!(result.receipt.date.as_deref(), Some("04/13/2025"));
}

#[test]
fn short_transcripts_are_not_meaningful() {
    assert!(!is_meaningful_transcript("  TOTAL  ", 10));
    assert!(is_meaningful_transcript("TOTAL 12.00", 10));
}

#[test]
fn parser_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HeuristicReceiptParser>();

    let parser = std::sync::Arc::new(HeuristicReceiptParser::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let parser = parser.clone();
            std::thread::spawn(move || parser.parse(GROCERY).receipt.total)
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(dec("1012.48")));
    }
}
