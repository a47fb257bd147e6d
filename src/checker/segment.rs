//! Separator-based splitting with byte-exact spans.

use lazy_static::lazy_static;
use regex::Regex;

use crate::typo::Span;

lazy_static! {
    /// Runs of whitespace; the word boundary for counting and for splitting a
    /// flagged substring during cross-validation.
    pub(crate) static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// True for the empty string and for strings of nothing but whitespace and
/// line breaks. Blank input is an expected case, not an error.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    WHITESPACE.split(text).filter(|w| !w.is_empty()).count()
}

/// Split `text` on every occurrence of `sep`, keeping each segment's
/// `[start, end)` byte range within `text`.
///
/// The segments tile `text` exactly: they are in order, non-overlapping, and
/// rejoining them with `sep` reproduces `text` byte for byte. Segments between
/// consecutive separators are empty and are kept; downstream length checks
/// discard them.
pub fn split_with_ranges(text: &str, sep: char) -> Vec<(Span, &str)> {
    let mut segments = Vec::new();
    let mut start = 0;

    for (idx, matched) in text.match_indices(sep) {
        segments.push((Span::new(start, idx), &text[start..idx]));
        start = idx + matched.len();
    }
    segments.push((Span::new(start, text.len()), &text[start..]));

    segments
}
