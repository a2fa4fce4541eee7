//! Vendor name extraction.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::patterns::{
    BARE_NUMBER, CONTACT, DOCUMENT_LABEL, EMAIL, LEADING_DATE, LEADING_TIME, PHONE, WEBSITE,
};
use super::{first_success, Strategy};
use crate::receipt::entities::EntityRecognizer;

/// Lines examined for a vendor candidate.
pub const VENDOR_LINES: usize = 3;

/// Lines handed to the entity recognizer.
pub const ENTITY_LINES: usize = 5;

/// Vendor names are shorter than this (in characters).
pub const MAX_VENDOR_CHARS: usize = 60;

/// Words that mark a line as receipt content rather than a name.
pub const RECEIPT_KEYWORDS: [&str; 9] = [
    "total", "subtotal", "tax", "amount", "date", "time", "item", "qty", "quantity",
];

lazy_static! {
    /// Line rejection rules in evaluation order.
    pub static ref SKIP_RULES: Vec<(&'static str, &'static Regex)> = vec![
        ("leading date", &*LEADING_DATE),
        ("leading time", &*LEADING_TIME),
        ("bare number", &*BARE_NUMBER),
        ("contact info", &*CONTACT),
        ("email", &*EMAIL),
        ("website", &*WEBSITE),
        ("phone number", &*PHONE),
        ("document label", &*DOCUMENT_LABEL),
    ];
}

type VendorAttempt = fn(&[String], &dyn EntityRecognizer) -> Option<String>;

/// The vendor chain in priority order.
pub static VENDOR_STRATEGIES: [Strategy<VendorAttempt>; 2] = [
    Strategy { name: "header line", attempt: header_line },
    Strategy { name: "organization entity", attempt: organization_entity },
];

/// Name of the first skip rule `line` matches.
pub fn skip_reason(line: &str) -> Option<&'static str> {
    SKIP_RULES
        .iter()
        .find(|(_, pattern)| pattern.is_match(line))
        .map(|(name, _)| *name)
}

/// Whether `line` at position `index` looks like a business name.
pub fn is_vendor_candidate(index: usize, line: &str) -> bool {
    if skip_reason(line).is_some() {
        return false;
    }

    let lowercased = line.to_lowercase();
    if RECEIPT_KEYWORDS.iter().any(|k| lowercased.contains(k)) {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let chars = line.chars().count();
    if words.is_empty() || words.len() > 6 || chars <= 2 || chars >= MAX_VENDOR_CHARS {
        return false;
    }

    // The first line is eligible regardless of capitalization
    index == 0
        || words
            .iter()
            .any(|w| w.chars().next().is_some_and(char::is_uppercase))
}

fn header_line(lines: &[String], _: &dyn EntityRecognizer) -> Option<String> {
    lines
        .iter()
        .take(VENDOR_LINES)
        .enumerate()
        .find(|(index, line)| is_vendor_candidate(*index, line))
        .map(|(_, line)| line.trim().to_string())
}

fn organization_entity(lines: &[String], recognizer: &dyn EntityRecognizer) -> Option<String> {
    let text = lines
        .iter()
        .take(ENTITY_LINES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ");

    recognizer
        .organizations(&text)
        .into_iter()
        .next()
        .filter(|name| name.chars().count() < MAX_VENDOR_CHARS)
}

/// Extract the vendor name from the line sequence.
pub fn extract_vendor(lines: &[String], recognizer: &dyn EntityRecognizer) -> Option<String> {
    first_success(&VENDOR_STRATEGIES, |attempt| attempt(lines, recognizer)).map(|(name, vendor)| {
        debug!(strategy = name, vendor = %vendor, "vendor found");
        vendor
    })
}
