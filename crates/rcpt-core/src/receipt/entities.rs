//! Organization-name recognition used as the vendor fallback.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // One to five capitalized words ending in a business suffix
    static ref ORGANIZATION: Regex = Regex::new(
        r"(?:[A-Z&][\w&'.-]*\s+){1,5}(?:Inc|LLC|L\.L\.C|Ltd|Limited|Co|Corp|Corporation|Company|GmbH|PLC|Group|Market|Supermarket|Restaurant|Cafe|Café|Coffee|Store|Stores|Pharmacy|Bakery|Grill|Bistro|Deli|Diner)\b\.?"
    ).unwrap();
}

/// Finds organization names in free text.
pub trait EntityRecognizer: Send + Sync {
    /// Candidate organization names, in text order.
    fn organizations(&self, text: &str) -> Vec<String>;
}

/// Recognizes organizations by a trailing business suffix
/// ("Blue Bottle Coffee Co.", "Joe's Diner", "Acme Corp").
#[derive(Debug, Clone, Copy, Default)]
pub struct SuffixEntityRecognizer;

impl SuffixEntityRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl EntityRecognizer for SuffixEntityRecognizer {
    fn organizations(&self, text: &str) -> Vec<String> {
        ORGANIZATION
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }
}

/// Recognizer that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntities;

impl EntityRecognizer for NoEntities {
    fn organizations(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}
