//! Tokenizer producing words, numbers, punctuation and links.
//!
//! Tokenization is rule based and works on any language written with
//! white space between words. The only language-dependent step is the
//! shape-based part-of-speech guess: in German, a capitalized word that does
//! not start a sentence is taken for a noun.

use crate::common::{is_all_caps, Language, PosTag};
use crate::sentence::{segment, SentenceContext, SentenceSpan};
use crate::token::{Token, TokenKind};

/// Characters that join two alphanumeric runs into one word.
const JOINERS: &[char] = &['-', '\'', '’'];

/// Characters stripped from the end of a link.
const LINK_TRAILERS: &[char] = &[
    '.', ',', ';', ':', '!', '?', ')', ']', '"', '\'', '»', '«', '“', '”', '’',
];

/// Symbol characters tagged `SYM` instead of `PUNCT`.
const SYMBOLS: &[char] = &[
    '$', '%', '&', '+', '<', '=', '>', '^', '|', '~', '§', '°', '€', '£', '¥', '©', '®', '™', '#',
    '*', '/', '@', '\\',
];

/// Rule-based tokenizer.
///
/// # Examples
///
/// ```
/// use vokabel::{Language, Tokenizer};
///
/// let tokenizer = Tokenizer::new(Language::De);
/// let doc = tokenizer.tokenize("Der Hund bellt. Die Katze schläft.");
/// assert_eq!(2, doc.num_sentences());
///
/// let surfaces: Vec<_> = doc.tokens().map(|t| t.surface()).collect();
/// assert_eq!(surfaces[..4], ["Der", "Hund", "bellt", "."]);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Tokenizer {
    language: Language,
}

impl Tokenizer {
    /// Creates a tokenizer for the given language.
    pub const fn new(language: Language) -> Self {
        Self { language }
    }

    /// Gets the language of the tokenizer.
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Segments `text` into sentences.
    ///
    /// Tokens are produced lazily by [`Document::tokens`].
    pub fn tokenize<'a>(&self, text: &'a str) -> Document<'a> {
        Document {
            text,
            language: self.language,
            spans: segment(text),
        }
    }
}

/// A segmented text.
#[derive(Clone, Debug)]
pub struct Document<'a> {
    text: &'a str,
    language: Language,
    spans: Vec<SentenceSpan>,
}

impl<'a> Document<'a> {
    /// Gets the source text.
    #[inline(always)]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Gets the language the document was tokenized for.
    #[inline(always)]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Gets the number of sentence units, including empty lines.
    #[inline(always)]
    pub fn num_sentences(&self) -> usize {
        self.spans.len()
    }

    /// Gets the text of the `i`-th sentence, or [`None`] if out of range.
    pub fn sentence(&self, i: usize) -> Option<&'a str> {
        self.spans.get(i).map(|s| &self.text[s.range_byte.clone()])
    }

    /// Iterates over the texts of all sentences.
    pub fn sentences(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.spans.iter().map(|s| &self.text[s.range_byte.clone()])
    }

    /// Creates an iterator over all tokens of the document.
    ///
    /// Each call starts from the beginning of the text again.
    pub fn tokens(&self) -> TokenIter<'_, 'a> {
        TokenIter::new(self)
    }

    /// Collects up to `size` sentences before and after sentence `i`.
    ///
    /// Empty units are skipped. An out-of-range index yields an empty context.
    pub fn context(&self, i: usize, size: usize) -> SentenceContext {
        let Some(sentence) = self.sentence(i) else {
            return SentenceContext::default();
        };
        let left = (i.saturating_sub(size)..i)
            .filter_map(|j| self.sentence(j))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let right = (i + 1..(i + 1 + size).min(self.spans.len()))
            .filter_map(|j| self.sentence(j))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        SentenceContext {
            left,
            sentence: sentence.to_string(),
            right,
        }
    }
}

/// Iterator of tokens, created by [`Document::tokens`].
pub struct TokenIter<'d, 'a> {
    doc: &'d Document<'a>,
    sentence: usize,
    pos_byte: usize,
    pos_char: usize,
    seen_word: bool,
    index: usize,
}

impl<'d, 'a> TokenIter<'d, 'a> {
    fn new(doc: &'d Document<'a>) -> Self {
        let mut iter = Self {
            doc,
            sentence: 0,
            pos_byte: 0,
            pos_char: 0,
            seen_word: false,
            index: 0,
        };
        iter.enter_sentence();
        iter
    }

    fn enter_sentence(&mut self) {
        if let Some(span) = self.doc.spans.get(self.sentence) {
            self.pos_byte = span.range_byte.start;
            self.pos_char = span.start_char;
            self.seen_word = false;
        }
    }

    fn infer_pos(&self, kind: TokenKind, surface: &str, sentence_start: bool) -> PosTag {
        match kind {
            TokenKind::Number => PosTag::Num,
            TokenKind::Link => PosTag::Sym,
            TokenKind::Punct => {
                if surface.chars().all(|c| SYMBOLS.contains(&c)) {
                    PosTag::Sym
                } else {
                    PosTag::Punct
                }
            }
            TokenKind::Word => {
                let capitalized = surface.chars().next().is_some_and(char::is_uppercase);
                if !self.doc.language.capitalizes_nouns() || !capitalized || sentence_start {
                    PosTag::X
                } else if is_all_caps(surface) {
                    PosTag::Propn
                } else {
                    PosTag::Noun
                }
            }
        }
    }
}

impl<'a> Iterator for TokenIter<'_, 'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let span = self.doc.spans.get(self.sentence)?;
            let rest = &self.doc.text[self.pos_byte..span.range_byte.end];

            let trimmed = rest.trim_start();
            let skipped = &rest[..rest.len() - trimmed.len()];
            self.pos_byte += skipped.len();
            self.pos_char += skipped.chars().count();

            if trimmed.is_empty() {
                self.sentence += 1;
                self.enter_sentence();
                continue;
            }

            let (len, kind) = scan_token(trimmed);
            let surface = &trimmed[..len];
            let len_char = surface.chars().count();

            let sentence_start = kind == TokenKind::Word && !self.seen_word;
            if matches!(kind, TokenKind::Word | TokenKind::Number) {
                self.seen_word = true;
            }
            let pos = self.infer_pos(kind, surface, sentence_start);

            let token = Token {
                surface,
                range_char: self.pos_char..self.pos_char + len_char,
                range_byte: self.pos_byte..self.pos_byte + len,
                kind,
                pos,
                sentence: self.sentence,
                sentence_start,
                index: self.index,
            };
            self.pos_byte += len;
            self.pos_char += len_char;
            self.index += 1;
            return Some(token);
        }
    }
}

/// Scans one token at the beginning of `s`, which must not start with white space.
///
/// Returns the length in bytes and the kind of the token.
fn scan_token(s: &str) -> (usize, TokenKind) {
    let Some(first) = s.chars().next() else {
        return (0, TokenKind::Punct);
    };
    if !first.is_alphanumeric() {
        return (first.len_utf8(), TokenKind::Punct);
    }

    let chunk = s.split(char::is_whitespace).next().unwrap_or(s);
    if is_link(chunk) {
        let core = chunk.trim_end_matches(LINK_TRAILERS);
        if !core.is_empty() {
            return (core.len(), TokenKind::Link);
        }
    }

    let len = scan_word(s);
    let kind = if s[..len]
        .chars()
        .filter(|c| c.is_alphanumeric())
        .all(char::is_numeric)
    {
        TokenKind::Number
    } else {
        TokenKind::Word
    };
    (len, kind)
}

/// Scans alphanumeric runs joined by [`JOINERS`].
fn scan_word(s: &str) -> usize {
    let mut end = 0;
    let mut chars = s.char_indices().peekable();
    loop {
        while let Some(&(i, c)) = chars.peek() {
            if !c.is_alphanumeric() {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }
        match chars.peek() {
            Some(&(_, j)) if JOINERS.contains(&j) => {
                let mut look = chars.clone();
                look.next();
                if look.peek().is_some_and(|&(_, c)| c.is_alphanumeric()) {
                    chars.next();
                } else {
                    break;
                }
            }
            _ => break,
        }
    }
    end
}

fn is_link(chunk: &str) -> bool {
    let lower = chunk.to_lowercase();
    if lower.contains("://") || lower.starts_with("www.") {
        return true;
    }
    if let Some((local, domain)) = chunk.split_once('@') {
        let domain = domain.trim_end_matches(LINK_TRAILERS);
        return !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.');
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces(text: &str) -> Vec<String> {
        Tokenizer::new(Language::De)
            .tokenize(text)
            .tokens()
            .map(|t| t.surface().to_string())
            .collect()
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(
            vec!["Die", "Kinder", "spielen", ",", "oder", "?"],
            surfaces("Die Kinder spielen, oder?")
        );
    }

    #[test]
    fn test_internal_hyphen_and_apostrophe() {
        assert_eq!(
            vec!["E-Mail", "und", "geht's", "-", "Haus", "-"],
            surfaces("E-Mail und geht's -Haus-")
        );
    }

    #[test]
    fn test_links() {
        let doc = Tokenizer::new(Language::De).tokenize("Siehe https://example.org/a. Oder mail@example.org!");
        let tokens: Vec<_> = doc.tokens().collect();
        assert_eq!("https://example.org/a", tokens[1].surface());
        assert_eq!(TokenKind::Link, tokens[1].kind());
        assert_eq!(PosTag::Sym, tokens[1].pos());
        assert_eq!(".", tokens[2].surface());
        assert_eq!("mail@example.org", tokens[4].surface());
        assert_eq!(TokenKind::Link, tokens[4].kind());
    }

    #[test]
    fn test_offsets() {
        let text = "Öl ist teuer. Äpfel nicht.";
        let doc = Tokenizer::new(Language::De).tokenize(text);
        let tokens: Vec<_> = doc.tokens().collect();
        let apfel = &tokens[4];
        assert_eq!("Äpfel", apfel.surface());
        assert_eq!(14..19, apfel.range_char());
        assert_eq!("Äpfel", &text[apfel.range_byte()]);
        assert_eq!(1, apfel.sentence());
        assert!(apfel.is_sentence_start());
        assert_eq!(4, apfel.index());
    }

    #[test]
    fn test_shape_pos() {
        let doc = Tokenizer::new(Language::De).tokenize("Heute kauft Anna 3 Bücher bei der EU.");
        let tags: Vec<_> = doc.tokens().map(|t| t.pos()).collect();
        assert_eq!(
            vec![
                PosTag::X,
                PosTag::X,
                PosTag::Noun,
                PosTag::Num,
                PosTag::Noun,
                PosTag::X,
                PosTag::X,
                PosTag::Propn,
                PosTag::Punct,
            ],
            tags
        );
    }

    #[test]
    fn test_english_has_no_noun_guess() {
        let doc = Tokenizer::new(Language::En).tokenize("I met Anna.");
        assert!(doc.tokens().all(|t| t.pos() != PosTag::Noun));
    }

    #[test]
    fn test_tokens_is_restartable() {
        let doc = Tokenizer::new(Language::De).tokenize("Eins zwei. Drei.");
        assert_eq!(doc.tokens().count(), doc.tokens().count());
        assert_eq!(5, doc.tokens().count());
    }

    #[test]
    fn test_context() {
        let doc = Tokenizer::new(Language::De).tokenize("Eins. Zwei. Drei. Vier.");
        let ctx = doc.context(1, 1);
        assert_eq!(vec!["Eins."], ctx.left);
        assert_eq!("Zwei.", ctx.sentence);
        assert_eq!(vec!["Drei."], ctx.right);

        let ctx = doc.context(0, 2);
        assert!(ctx.left.is_empty());
        assert_eq!(vec!["Zwei.", "Drei."], ctx.right);

        assert_eq!(SentenceContext::default(), doc.context(9, 1));
    }

    #[test]
    fn test_empty_text() {
        let doc = Tokenizer::new(Language::De).tokenize("   ");
        assert_eq!(0, doc.num_sentences());
        assert_eq!(0, doc.tokens().count());
    }
}
