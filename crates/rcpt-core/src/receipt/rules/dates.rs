//! Date and time extraction from the receipt header.
//!
//! Extraction runs an ordered list of strategies over the header region
//! (the first [`HEADER_LINES`](super::HEADER_LINES) lines). Each strategy
//! declares which field it fills and is skipped once that field is known,
//! so an earlier strategy always wins over a later one.

use chrono::{NaiveDate, NaiveTime};
use regex::{Captures, Regex};
use tracing::debug;

use super::lines::{header_region, split_lines};
use super::patterns::{
    DATE_MONTH_NAME, DATE_NUMERIC, DATE_YEAR_FIRST, DETECT_DAY_MONTH, DETECT_MONTH_DAY,
    DETECT_NUMERIC, DETECT_YEAR_FIRST, TIME_CLOCK, TIME_SECONDS,
};

/// Date and time found in a transcript, both in their printed form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTimeFields {
    pub date: Option<String>,
    pub time: Option<String>,
}

/// A date found by a [`DateDetector`].
///
/// Carries the matched text only, which may include a trailing clock time;
/// the extraction chain splits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub text: String,
}

impl DateMatch {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// General date recognition over free text.
pub trait DateDetector: Send + Sync {
    /// All dates found in `text`, in text order.
    fn detect(&self, text: &str) -> Vec<DateMatch>;
}

/// Detects calendar dates, optionally followed by a clock time.
///
/// Recognizes numeric dates (`04/13/2025`, `13.04.25`, `2025-04-13`) and
/// English month-name dates (`Jan 5, 2024`, `5 January 2024`). Numeric
/// day/month order is not resolved; a match only has to be a real calendar
/// date in one of the two readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarDateDetector;

impl CalendarDateDetector {
    pub fn new() -> Self {
        Self
    }
}

impl DateDetector for CalendarDateDetector {
    fn detect(&self, text: &str) -> Vec<DateMatch> {
        let kinds: [(&Regex, fn(&Captures) -> bool); 4] = [
            (&*DETECT_NUMERIC, valid_numeric),
            (&*DETECT_YEAR_FIRST, valid_year_first),
            (&*DETECT_MONTH_DAY, valid_month_day),
            (&*DETECT_DAY_MONTH, valid_day_month),
        ];

        let mut hits: Vec<(usize, usize, DateMatch)> = Vec::new();
        for (pattern, is_valid) in kinds {
            for caps in pattern.captures_iter(text) {
                if !is_valid(&caps) {
                    continue;
                }
                if let Some(hit) = to_match(text, &caps) {
                    hits.push(hit);
                }
            }
        }

        // Earliest first; on equal start the longer match wins
        hits.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut matches = Vec::new();
        let mut last_end = 0;
        for (start, end, hit) in hits {
            if start < last_end {
                continue;
            }
            last_end = end;
            matches.push(hit);
        }
        matches
    }
}

fn to_match(text: &str, caps: &Captures) -> Option<(usize, usize, DateMatch)> {
    let whole = caps.get(0)?;
    let date_end = caps.get(3)?.end();

    // A trailing time is only kept when it is a real clock time
    let end = match caps.get(4) {
        Some(time) if valid_clock(time.as_str()) => whole.end(),
        _ => date_end,
    };
    Some((whole.start(), end, DateMatch::new(&text[whole.start()..end])))
}

fn number(caps: &Captures, group: usize) -> u32 {
    caps.get(group).and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

fn full_year(caps: &Captures, group: usize) -> i32 {
    let year = number(caps, group) as i32;
    if year < 100 { 2000 + year } else { year }
}

fn plausible(year: i32, month: u32, day: u32) -> bool {
    (1970..=2100).contains(&year) && NaiveDate::from_ymd_opt(year, month, day).is_some()
}

fn valid_numeric(caps: &Captures) -> bool {
    let (a, b, year) = (number(caps, 1), number(caps, 2), full_year(caps, 3));
    plausible(year, a, b) || plausible(year, b, a)
}

fn valid_year_first(caps: &Captures) -> bool {
    plausible(full_year(caps, 1), number(caps, 2), number(caps, 3))
}

fn valid_month_day(caps: &Captures) -> bool {
    let month = caps.get(1).map(|m| month_number(m.as_str())).unwrap_or(0);
    plausible(full_year(caps, 3), month, number(caps, 2))
}

fn valid_day_month(caps: &Captures) -> bool {
    let month = caps.get(2).map(|m| month_number(m.as_str())).unwrap_or(0);
    plausible(full_year(caps, 3), month, number(caps, 1))
}

fn month_number(name: &str) -> u32 {
    let lowered = name.to_ascii_lowercase();
    match lowered.get(..3).unwrap_or("") {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => 0,
    }
}

/// Whether `s` ("H:MM", "H:MM:SS", optionally with AM/PM) is a real time.
fn valid_clock(s: &str) -> bool {
    let lowered = s.to_ascii_lowercase();
    let meridiem = lowered.contains('a') || lowered.contains('p');
    let clock: String = lowered
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ':')
        .collect();

    let parts: Vec<u32> = clock.split(':').filter_map(|p| p.parse().ok()).collect();
    let (hour, minute, second) = match parts.as_slice() {
        [h, m] => (*h, *m, 0),
        [h, m, s] => (*h, *m, *s),
        _ => return false,
    };
    if meridiem && !(1..=12).contains(&hour) {
        return false;
    }
    NaiveTime::from_hms_opt(hour, minute, second).is_some()
}

/// Header lines plus their space-joined form.
#[derive(Debug, Clone)]
pub struct HeaderText<'a> {
    pub lines: &'a [String],
    pub joined: String,
}

impl<'a> HeaderText<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, joined: lines.join(" ") }
    }
}

/// Which fields a strategy can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fills {
    Date,
    Time,
    DateAndTime,
}

impl Fills {
    fn wanted(&self, found: &DateTimeFields) -> bool {
        match self {
            Fills::Date => found.date.is_none(),
            Fills::Time => found.time.is_none(),
            Fills::DateAndTime => found.date.is_none() || found.time.is_none(),
        }
    }
}

type DateTimeAttempt = fn(&HeaderText<'_>, &dyn DateDetector, &mut DateTimeFields);

/// One step of the date/time extraction chain.
pub struct DateTimeStrategy {
    pub name: &'static str,
    pub fills: Fills,
    attempt: DateTimeAttempt,
}

/// The date/time chain in priority order.
pub static DATE_TIME_STRATEGIES: [DateTimeStrategy; 4] = [
    DateTimeStrategy { name: "labelled", fills: Fills::DateAndTime, attempt: labelled },
    DateTimeStrategy { name: "date detector", fills: Fills::Date, attempt: detected },
    DateTimeStrategy { name: "date patterns", fills: Fills::Date, attempt: date_patterns },
    DateTimeStrategy { name: "time patterns", fills: Fills::Time, attempt: time_patterns },
];

/// Extract the transaction date and time from a transcript.
///
/// Only the header region is examined, so dates in footers, promotions or
/// barcodes are never picked up.
pub fn extract_date_and_time(text: &str, detector: &dyn DateDetector) -> DateTimeFields {
    let lines = split_lines(text);
    let header = HeaderText::new(header_region(&lines));

    let mut found = DateTimeFields::default();
    for strategy in &DATE_TIME_STRATEGIES {
        if !strategy.fills.wanted(&found) {
            continue;
        }
        let before = found.clone();
        (strategy.attempt)(&header, detector, &mut found);
        if found != before {
            debug!(strategy = strategy.name, date = ?found.date, time = ?found.time, "date/time strategy hit");
        }
    }
    found
}

fn after_first_colon(line: &str) -> Option<&str> {
    line.split_once(':')
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
}

/// Lines labelled "Date:" or "Time:".
fn labelled(header: &HeaderText<'_>, _: &dyn DateDetector, found: &mut DateTimeFields) {
    for line in header.lines {
        let lowercased = line.to_lowercase();
        let has_colon = line.contains(':');

        if lowercased.contains("date") && has_colon {
            if let Some(rest) = after_first_colon(line) {
                for part in rest.split_whitespace() {
                    if part.contains(':') {
                        if found.time.is_none() {
                            found.time = Some(part.to_string());
                        }
                    } else if found.date.is_none() && part.chars().any(|c| c.is_ascii_digit()) {
                        found.date = Some(part.to_string());
                    }
                }
                if found.date.is_none() {
                    found.date = Some(rest.to_string());
                }
            }
        }

        if lowercased.contains("time") && has_colon && found.time.is_none() {
            if let Some(rest) = after_first_colon(line) {
                if rest.contains(':') {
                    found.time = Some(rest.to_string());
                }
            }
        }
    }
}

/// First detector match that is not an expiry/validity date.
fn detected(header: &HeaderText<'_>, detector: &dyn DateDetector, found: &mut DateTimeFields) {
    let candidate = detector.detect(&header.joined).into_iter().find(|m| {
        let lowercased = m.text.to_lowercase();
        !lowercased.contains("exp") && !lowercased.contains("valid")
    });

    if let Some(m) = candidate {
        split_date_time(&m.text, found);
    }
}

/// Fill date and time from a matched date string.
///
/// Without a colon the whole text is the date. Otherwise the text is split
/// on spaces: the first part with a colon fills the time (when unknown) and
/// the first part without one fills the date, falling back to the whole text.
fn split_date_time(text: &str, found: &mut DateTimeFields) {
    if !text.contains(':') {
        found.date = Some(text.to_string());
        return;
    }

    for part in text.split(' ').filter(|p| !p.is_empty()) {
        if part.contains(':') {
            if found.time.is_none() {
                found.time = Some(part.to_string());
            }
        } else if found.date.is_none() {
            found.date = Some(part.to_string());
        }
    }
    if found.date.is_none() {
        found.date = Some(text.to_string());
    }
}

fn date_patterns(header: &HeaderText<'_>, _: &dyn DateDetector, found: &mut DateTimeFields) {
    let patterns: [&Regex; 3] = [&*DATE_NUMERIC, &*DATE_YEAR_FIRST, &*DATE_MONTH_NAME];
    found.date = patterns
        .iter()
        .find_map(|p| p.find(&header.joined))
        .map(|m| m.as_str().to_string());
}

fn time_patterns(header: &HeaderText<'_>, _: &dyn DateDetector, found: &mut DateTimeFields) {
    let patterns: [&Regex; 2] = [&*TIME_CLOCK, &*TIME_SECONDS];
    found.time = patterns
        .iter()
        .find_map(|p| p.find(&header.joined))
        .map(|m| m.as_str().trim().to_string());
}
