//! Common regex patterns for receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// English month names and abbreviations.
const MONTHS: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// Optional clock time following a date; captured as the last group.
const TIME_TAIL: &str = r"(?:(?:,?\s+|T)(\d{1,2}:\d{2}(?::\d{2})?(?:\s*[AaPp]\.?[Mm]\.?)?))?";

lazy_static! {
    // Money token: optional "$", then thousands-grouped or plain digits,
    // then optionally exactly two fractional digits. Bare integers match.
    pub static ref MONEY: Regex = Regex::new(
        r"\$?\s*((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?)"
    ).unwrap();

    // Header date patterns, tried in this order by the fallback strategy
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}"
    ).unwrap();

    pub static ref DATE_YEAR_FIRST: Regex = Regex::new(
        r"\d{4}[/-]\d{1,2}[/-]\d{1,2}"
    ).unwrap();

    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"[A-Z][a-z]+\s+\d{1,2},?\s+\d{4}"
    ).unwrap();

    // Header time patterns
    pub static ref TIME_CLOCK: Regex = Regex::new(
        r"\d{1,2}:\d{2}\s*(AM|PM|am|pm)?"
    ).unwrap();

    pub static ref TIME_SECONDS: Regex = Regex::new(
        r"\d{1,2}:\d{2}:\d{2}"
    ).unwrap();

    // Calendar date detection (date, then an optional trailing clock time)
    pub static ref DETECT_NUMERIC: Regex = Regex::new(&format!(
        r"\b(\d{{1,2}})[/.\-](\d{{1,2}})[/.\-](\d{{4}}|\d{{2}})\b{}", TIME_TAIL
    )).unwrap();

    pub static ref DETECT_YEAR_FIRST: Regex = Regex::new(&format!(
        r"\b(\d{{4}})[/.\-](\d{{1,2}})[/.\-](\d{{1,2}})\b{}", TIME_TAIL
    )).unwrap();

    pub static ref DETECT_MONTH_DAY: Regex = Regex::new(&format!(
        r"(?i)\b({})\b\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b{}", MONTHS, TIME_TAIL
    )).unwrap();

    pub static ref DETECT_DAY_MONTH: Regex = Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({})\b\.?,?\s+(\d{{4}})\b{}", MONTHS, TIME_TAIL
    )).unwrap();

    // Lines that cannot be a vendor name
    pub static ref LEADING_DATE: Regex = Regex::new(r"^\d{1,2}[/-]\d{1,2}[/-]\d{2,4}").unwrap();
    pub static ref LEADING_TIME: Regex = Regex::new(r"^\d{1,2}:\d{2}").unwrap();
    pub static ref BARE_NUMBER: Regex = Regex::new(r"^\$?\d+\.?\d*$").unwrap();
    pub static ref CONTACT: Regex = Regex::new(r"phone|tel|fax").unwrap();
    pub static ref EMAIL: Regex = Regex::new(r"@.*\.(com|net|org)").unwrap();
    pub static ref WEBSITE: Regex = Regex::new(r"www\.").unwrap();
    pub static ref PHONE: Regex = Regex::new(r"^\d{3}[-.\s]?\d{3}[-.\s]?\d{4}").unwrap();
    pub static ref DOCUMENT_LABEL: Regex = Regex::new(r"^receipt|^invoice").unwrap();

    // Currency: ISO code or symbol, whichever comes first
    pub static ref CURRENCY: Regex = Regex::new(
        r"\b(USD|EUR|GBP|CAD|AUD|JPY|CHF)\b|([$€£¥])"
    ).unwrap();
}
