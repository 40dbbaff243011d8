//! Removal of German genitive endings from nouns.
//!
//! "des Mannes" carries the lemma "Mann", but a lemma index built from
//! inflected surfaces does not always know the genitive form. The fixer
//! strips the ending when the remaining stem is a known noun, and strips a
//! plain `-s`/`-es` on its own when the stem looks safe to cut.

use std::borrow::Cow;

use hashbrown::HashSet;

use crate::common::{Language, PosTag};
use crate::resources::ResourceContext;

/// Endings tried in order. A longer ending is preferred.
const ENDINGS: &[&str] = &["es", "en", "er", "s", "n"];

/// Endings removed even when the stem is unknown.
const BLIND_ENDINGS: &[&str] = &["es", "s"];

const MIN_STEM_LEN: usize = 3;

/// Nouns whose final `-s` belongs to the stem.
const DEFAULT_EXCEPTIONS: &[&str] = &[
    "Atlas", "Bauer", "Bonus", "Bus", "Chaos", "Eis", "Erlebnis", "Ergebnis", "Fels", "Fluss",
    "Gas", "Geheimnis", "Glas", "Globus", "Gras", "Hals", "Haus", "Iris", "Kaktus", "Kompass",
    "Kosmos", "Kreis", "Kurs", "Kuss", "Maus", "Meter", "Mythos", "Preis", "Prozess", "Puls",
    "Reis", "Rhythmus", "Schluss", "Status", "Virus", "Zeugnis", "Zirkus",
];

/// Strips genitive endings from German nouns.
pub struct GenitiveFixer<'r> {
    ctx: &'r ResourceContext,
    exceptions: HashSet<String>,
}

impl<'r> GenitiveFixer<'r> {
    /// Creates a fixer with the built-in exception list.
    pub fn new(ctx: &'r ResourceContext) -> Self {
        Self {
            ctx,
            exceptions: DEFAULT_EXCEPTIONS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Adds words that are never stripped.
    pub fn with_exceptions<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exceptions.extend(words.into_iter().map(Into::into));
        self
    }

    /// Returns the word without its genitive ending.
    ///
    /// Only `NOUN` and `PROPN` tokens are touched. Words that are exceptions
    /// or already known surfaces of the lemma index are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use vokabel::{GenitiveFixer, LemmaIndex, PosTag, ResourceContext};
    ///
    /// let index = LemmaIndex::from_reader("Mann,NOUN,Mann,1\n".as_bytes())?;
    /// let ctx = ResourceContext::builder(index).build()?;
    /// let fixer = GenitiveFixer::new(&ctx);
    ///
    /// assert_eq!("Mann", fixer.fix("Mannes", PosTag::Noun));
    /// assert_eq!("Hauses", fixer.fix("Hauses", PosTag::Verb));
    /// # Ok::<(), vokabel::errors::VokabelError>(())
    /// ```
    pub fn fix<'a>(&self, word: &'a str, pos: PosTag) -> Cow<'a, str> {
        if !pos.is_nominal() || self.is_exception(word) || self.ctx.index().contains_surface(word) {
            return Cow::Borrowed(word);
        }

        for ending in ENDINGS {
            let Some(stem) = word.strip_suffix(ending) else {
                continue;
            };
            if stem.chars().count() < 2 {
                continue;
            }
            if self.is_known_noun(stem) {
                log::trace!("genitive {word:?} -> {stem:?}");
                return Cow::Borrowed(stem);
            }
        }

        for ending in BLIND_ENDINGS {
            let Some(stem) = word.strip_suffix(ending) else {
                continue;
            };
            if self.can_strip_blindly(stem, ending) {
                log::trace!("genitive {word:?} -> {stem:?} (unknown stem)");
                return Cow::Borrowed(stem);
            }
        }
        Cow::Borrowed(word)
    }

    fn is_exception(&self, word: &str) -> bool {
        self.exceptions.contains(word)
    }

    fn is_known_noun(&self, stem: &str) -> bool {
        self.ctx.index().is_noun_lemma(stem)
            || self
                .ctx
                .dictionary(Language::De)
                .is_some_and(|d| d.contains(stem))
    }

    fn can_strip_blindly(&self, stem: &str, ending: &str) -> bool {
        if stem.chars().count() < MIN_STEM_LEN || self.is_exception(stem) {
            return false;
        }
        if ending == "s" {
            let lower = stem.to_lowercase();
            if lower.ends_with(['s', 'ß', 'x', 'z'])
                || ["ei", "au", "eu", "äu"].iter().any(|d| lower.ends_with(d))
            {
                return false;
            }
        }
        true
    }
}
