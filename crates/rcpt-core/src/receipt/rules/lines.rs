//! Line splitting and the header region.

/// Number of leading lines treated as the receipt header.
pub const HEADER_LINES: usize = 10;

const LINE_BREAKS: [char; 7] = [
    '\n', '\r', '\u{000B}', '\u{000C}', '\u{0085}', '\u{2028}', '\u{2029}',
];

/// Split a transcript into trimmed, non-empty lines, preserving order.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split(LINE_BREAKS)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// The first [`HEADER_LINES`] lines.
pub fn header_region(lines: &[String]) -> &[String] {
    &lines[..lines.len().min(HEADER_LINES)]
}

/// Whether a transcript carries enough text to be worth parsing.
///
/// OCR output shorter than `min_chars` (after trimming) is treated as
/// "no text found".
pub fn is_meaningful_transcript(text: &str, min_chars: usize) -> bool {
    text.trim().chars().count() >= min_chars
}
