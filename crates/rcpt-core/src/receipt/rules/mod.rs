//! Rule-based field extractors for receipt transcripts.

pub mod lines;
pub mod amounts;
pub mod dates;
pub mod vendor;
pub mod total;
pub mod summary;
pub mod patterns;

pub use lines::{split_lines, header_region, is_meaningful_transcript, HEADER_LINES};
pub use amounts::{extract_money_amounts, first_amount_in_line, parse_money_amount, AmountExtractor};
pub use dates::{extract_date_and_time, CalendarDateDetector, DateDetector, DateMatch, DateTimeFields};
pub use vendor::{extract_vendor, skip_reason};
pub use total::extract_total;
pub use summary::{detect_currency, extract_subtotal, extract_tax};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value together with the span of text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source text.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, start: usize, end: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            position: (start, end),
            source: source.into(),
        }
    }
}

/// A named extraction attempt within a fallback chain.
///
/// `F` is the attempt's function type; each field defines its own
/// signature and keeps its chain as a static slice so the priority order
/// can be inspected.
#[derive(Clone, Copy)]
pub struct Strategy<F> {
    /// Name reported in logs.
    pub name: &'static str,
    /// The attempt itself.
    pub attempt: F,
}

/// Run `strategies` in order and return the first success with the name of
/// the strategy that produced it.
pub fn first_success<F, O>(
    strategies: &[Strategy<F>],
    mut run: impl FnMut(&F) -> Option<O>,
) -> Option<(&'static str, O)> {
    strategies
        .iter()
        .find_map(|strategy| run(&strategy.attempt).map(|value| (strategy.name, value)))
}
