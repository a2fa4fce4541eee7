//! Secondary summary lines: tax, subtotal and currency.

use rust_decimal::Decimal;

use super::amounts::first_amount_in_line;
use super::patterns::CURRENCY;

/// Keywords marking a tax line.
pub const TAX_KEYWORDS: [&str; 5] = ["tax", "vat", "gst", "hst", "sales tax"];

/// Tax amounts at or above this are rejected.
pub const MAX_TAX: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// First (top-down) tax line carrying a plausible amount.
pub fn extract_tax(lines: &[String]) -> Option<Decimal> {
    lines.iter().find_map(|line| {
        let lowercased = line.to_lowercase();
        if !TAX_KEYWORDS.iter().any(|k| lowercased.contains(k)) {
            return None;
        }
        first_amount_in_line(line).filter(|amount| *amount >= Decimal::ZERO && *amount < MAX_TAX)
    })
}

/// First line mentioning "subtotal" that carries an amount.
pub fn extract_subtotal(lines: &[String]) -> Option<Decimal> {
    lines
        .iter()
        .filter(|line| line.to_lowercase().contains("subtotal"))
        .find_map(|line| first_amount_in_line(line))
}

/// ISO 4217 code from the first currency code or symbol in `text`.
pub fn detect_currency(text: &str) -> Option<String> {
    let caps = CURRENCY.captures(text)?;
    if let Some(code) = caps.get(1) {
        return Some(code.as_str().to_string());
    }
    let code = match caps.get(2)?.as_str() {
        "$" => "USD",
        "€" => "EUR",
        "£" => "GBP",
        "¥" => "JPY",
        _ => return None,
    };
    Some(code.to_string())
}
