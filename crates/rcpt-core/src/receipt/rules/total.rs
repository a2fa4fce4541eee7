//! Total amount extraction.

use rust_decimal::Decimal;
use tracing::debug;

use super::amounts::first_amount_in_line;
use super::{first_success, Strategy};

/// Smallest amount the largest-value fallback accepts.
pub const MIN_FALLBACK_TOTAL: Decimal = Decimal::ONE;

/// Amounts at or above this are treated as parsing artifacts.
pub const MAX_FALLBACK_TOTAL: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

type TotalAttempt = fn(&[String], &[Decimal]) -> Option<Decimal>;

/// The total chain in priority order.
pub static TOTAL_STRATEGIES: [Strategy<TotalAttempt>; 2] = [
    Strategy { name: "labelled line", attempt: labelled_line },
    Strategy { name: "largest amount", attempt: largest_amount },
];

/// Bottom-up: the last line mentioning "total" (but not "subtotal") that
/// carries an amount.
fn labelled_line(lines: &[String], _: &[Decimal]) -> Option<Decimal> {
    lines.iter().rev().find_map(|line| {
        let lowercased = line.to_lowercase();
        if lowercased.contains("total") && !lowercased.contains("subtotal") {
            first_amount_in_line(line)
        } else {
            None
        }
    })
}

/// The largest known amount, if it is a plausible total.
fn largest_amount(_: &[String], amounts: &[Decimal]) -> Option<Decimal> {
    amounts
        .last()
        .copied()
        .filter(|largest| *largest >= MIN_FALLBACK_TOTAL && *largest < MAX_FALLBACK_TOTAL)
}

/// Extract the total from the line sequence and the ascending amount list.
pub fn extract_total(lines: &[String], amounts: &[Decimal]) -> Option<Decimal> {
    first_success(&TOTAL_STRATEGIES, |attempt| attempt(lines, amounts)).map(|(name, total)| {
        debug!(strategy = name, %total, "total found");
        total
    })
}
