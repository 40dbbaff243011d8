//! Common definitions shared by all components.

use std::fmt;
use std::str::FromStr;

use crate::errors::{Result, VokabelError};

/// Languages supported by the pipeline.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
pub enum Language {
    /// German.
    #[default]
    De,
    /// English.
    En,
}

impl Language {
    /// Returns the ISO 639-1 code of the language.
    pub const fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Returns `true` if common nouns are written with an initial capital.
    pub const fn capitalizes_nouns(self) -> bool {
        matches!(self, Self::De)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = VokabelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" => Ok(Self::De),
            "en" => Ok(Self::En),
            _ => Err(VokabelError::invalid_argument(
                "language",
                format!("unsupported language {s:?}; expected de or en"),
            )),
        }
    }
}

/// Universal Dependencies part-of-speech tags.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    /// Other or unknown.
    X,
}

impl PosTag {
    /// All tags, in the order of the Universal Dependencies documentation.
    pub const ALL: [Self; 17] = [
        Self::Adj,
        Self::Adp,
        Self::Adv,
        Self::Aux,
        Self::Cconj,
        Self::Det,
        Self::Intj,
        Self::Noun,
        Self::Num,
        Self::Part,
        Self::Pron,
        Self::Propn,
        Self::Punct,
        Self::Sconj,
        Self::Sym,
        Self::Verb,
        Self::X,
    ];

    /// Returns the upper-case tag name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adj => "ADJ",
            Self::Adp => "ADP",
            Self::Adv => "ADV",
            Self::Aux => "AUX",
            Self::Cconj => "CCONJ",
            Self::Det => "DET",
            Self::Intj => "INTJ",
            Self::Noun => "NOUN",
            Self::Num => "NUM",
            Self::Part => "PART",
            Self::Pron => "PRON",
            Self::Propn => "PROPN",
            Self::Punct => "PUNCT",
            Self::Sconj => "SCONJ",
            Self::Sym => "SYM",
            Self::Verb => "VERB",
            Self::X => "X",
        }
    }

    /// Returns `true` for `NOUN` and `PROPN`.
    #[inline(always)]
    pub const fn is_nominal(self) -> bool {
        matches!(self, Self::Noun | Self::Propn)
    }

    /// Returns `true` for tags that never carry vocabulary.
    #[inline(always)]
    pub const fn is_non_lexical(self) -> bool {
        matches!(self, Self::Punct | Self::Num | Self::Sym)
    }

    /// Returns `true` if the tag is `X`, i.e., nothing is known about the word.
    #[inline(always)]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::X)
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PosTag {
    type Err = VokabelError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == upper)
            .ok_or_else(|| {
                VokabelError::invalid_argument("pos_tag", format!("unknown POS tag {s:?}"))
            })
    }
}

/// Upper-cases the first character and leaves the rest untouched.
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Keeps the first character and lower-cases the rest.
///
/// Single characters are returned as they are.
pub fn lower_tail(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if word.chars().count() >= 2 => {
            std::iter::once(first).chain(chars.flat_map(char::to_lowercase)).collect()
        }
        _ => word.to_string(),
    }
}

/// Returns `true` if the word is written entirely in capitals (two chars or more).
pub fn is_all_caps(word: &str) -> bool {
    word.chars().count() > 1
        && word.chars().any(char::is_alphabetic)
        && word.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
}

/// Returns `true` if an upper-case letter appears after the first character.
pub fn has_internal_caps(word: &str) -> bool {
    word.chars().skip(1).any(char::is_uppercase)
}
