//! Sentence segmentation.
//!
//! A text is cut into sentence units before tokenization. If the text spans
//! several lines, each line is one unit so that line-aligned parallel texts
//! keep their alignment. Otherwise the text is split after sentence
//! terminators.

use std::ops::Range;

/// Abbreviations (without the final period) that never end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "z.B", "d.h", "u.a", "o.ä", "usw", "bzw", "etc", "vgl", "ca", "Nr", "Dr", "Prof", "Hr", "Fr",
    "St", "Str", "Mio", "Mrd", "evtl", "ggf", "inkl", "max", "min", "e.g", "i.e", "Mr", "Mrs",
    "Ms", "vs",
];

/// Characters that may follow a terminator and still belong to the sentence.
const CLOSERS: &[char] = &['"', '\'', ')', ']', '»', '«', '“', '”', '’'];

/// Location of a sentence unit inside the source text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SentenceSpan {
    /// Byte range in the source text, without surrounding white space.
    pub range_byte: Range<usize>,

    /// Character offset of the first character of the unit.
    pub start_char: usize,
}

/// Sentences surrounding an occurrence.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct SentenceContext {
    /// Up to `size` preceding sentences, oldest first.
    pub left: Vec<String>,

    /// The sentence containing the occurrence.
    pub sentence: String,

    /// Up to `size` following sentences.
    pub right: Vec<String>,
}

impl SentenceContext {
    /// Joins the preceding sentences with single spaces.
    pub fn left_text(&self) -> String {
        self.left.join(" ")
    }

    /// Joins the following sentences with single spaces.
    pub fn right_text(&self) -> String {
        self.right.join(" ")
    }
}

/// Splits `text` into sentence units.
///
/// Empty lines are kept as empty units in line mode.
pub fn segment(text: &str) -> Vec<SentenceSpan> {
    let ranges = if text.trim().contains('\n') {
        split_lines(text)
    } else {
        split_sentences(text)
    };

    // Character offsets are computed in one forward pass.
    let mut spans = Vec::with_capacity(ranges.len());
    let mut pos_byte = 0;
    let mut pos_char = 0;
    for range in ranges {
        pos_char += text[pos_byte..range.start].chars().count();
        pos_byte = range.start;
        spans.push(SentenceSpan {
            range_byte: range,
            start_char: pos_char,
        });
    }
    spans
}

fn split_lines(text: &str) -> Vec<Range<usize>> {
    let mut ranges = vec![];
    let mut start = 0;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        ranges.push(trimmed_range(text, start..start + content.len()));
        start += line.len();
    }
    // A trailing newline does not open another unit.
    if ranges.last().is_some_and(|r| r.is_empty()) && text.ends_with('\n') {
        ranges.pop();
    }
    ranges
}

fn split_sentences(text: &str) -> Vec<Range<usize>> {
    let mut ranges = vec![];
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((i, c)) = iter.next() {
        if !matches!(c, '.' | '!' | '?' | '…') {
            continue;
        }
        // Consume the whole run of terminators and closing quotes.
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = iter.peek() {
            if matches!(next, '.' | '!' | '?' | '…') || CLOSERS.contains(&next) {
                end = j + next.len_utf8();
                iter.next();
            } else {
                break;
            }
        }
        let at_boundary = iter.peek().is_none_or(|&(_, next)| next.is_whitespace());
        if !at_boundary || (c == '.' && is_abbreviation_or_ordinal(&text[start..i])) {
            continue;
        }
        let range = trimmed_range(text, start..end);
        if !range.is_empty() {
            ranges.push(range);
        }
        start = end;
    }

    let rest = trimmed_range(text, start..text.len());
    if !rest.is_empty() {
        ranges.push(rest);
    }
    ranges
}

/// Checks the word right before a period.
fn is_abbreviation_or_ordinal(before: &str) -> bool {
    let word = before
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");
    if word.is_empty() {
        return false;
    }
    if word.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if word.chars().count() == 1 && word.chars().all(char::is_alphabetic) {
        return true;
    }
    ABBREVIATIONS.contains(&word)
}

fn trimmed_range(text: &str, range: Range<usize>) -> Range<usize> {
    let slice = &text[range.clone()];
    let start = range.start + (slice.len() - slice.trim_start().len());
    let end = range.end - (slice.len() - slice.trim_end().len());
    if start >= end {
        start..start
    } else {
        start..end
    }
}
