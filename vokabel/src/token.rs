//! Container of tokenization results.
//!
//! A [`Token`] borrows its surface from the analysed text and carries the
//! positional information needed to attach contexts and to order entries.

use std::ops::Range;

use crate::common::PosTag;

/// Coarse category of a token, decided from its characters only.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// A run of letters and digits, possibly joined by internal hyphens or apostrophes.
    Word,
    /// A run of digits only.
    Number,
    /// A single punctuation or symbol character.
    Punct,
    /// A URL or an e-mail address.
    Link,
}

/// A single token of the input text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token<'a> {
    pub(crate) surface: &'a str,
    pub(crate) range_char: Range<usize>,
    pub(crate) range_byte: Range<usize>,
    pub(crate) kind: TokenKind,
    pub(crate) pos: PosTag,
    pub(crate) sentence: usize,
    pub(crate) sentence_start: bool,
    pub(crate) index: usize,
}

impl<'a> Token<'a> {
    /// Gets the surface string of the token.
    #[inline(always)]
    pub fn surface(&self) -> &'a str {
        self.surface
    }

    /// Gets the position range of the token in characters.
    ///
    /// The range is relative to the whole text, not to the sentence.
    #[inline(always)]
    pub fn range_char(&self) -> Range<usize> {
        self.range_char.clone()
    }

    /// Gets the position range of the token in bytes.
    #[inline(always)]
    pub fn range_byte(&self) -> Range<usize> {
        self.range_byte.clone()
    }

    /// Gets the character category of the token.
    #[inline(always)]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Gets the part of speech inferred from the shape of the token.
    ///
    /// This is a first guess; the resolver may refine it with the lemma index.
    #[inline(always)]
    pub fn pos(&self) -> PosTag {
        self.pos
    }

    /// Gets the index of the sentence containing the token.
    #[inline(always)]
    pub fn sentence(&self) -> usize {
        self.sentence
    }

    /// Returns `true` if this is the first word of its sentence.
    #[inline(always)]
    pub fn is_sentence_start(&self) -> bool {
        self.sentence_start
    }

    /// Gets the ordinal of the token within the whole text.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` if the token may carry vocabulary.
    #[inline(always)]
    pub fn is_lexical(&self) -> bool {
        self.kind == TokenKind::Word && !self.pos.is_non_lexical()
    }
}
